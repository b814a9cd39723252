//! Streaming job-record extraction built on `lol_html`
//!
//! The extractor never builds a DOM. It listens to opening-tag and text
//! events in document order and drives an [`ExtractorState`] machine:
//!
//! - a job-boundary tag starts a record seeded from its own attributes
//! - a title or posted-date region tag arms capture of the next text event
//! - the posted-date text completes the record
//! - a next-page link tag records the pagination URL
//!
//! Malformed markup is never an error. Whatever could be assembled before the
//! tokenizer gave up is returned.

use crate::config::{Config, ExtractorConfig, RecordField};
use crate::crawler::signature::{StartTag, TriggerKind, TriggerSet};
use crate::state::{last_token, ExtractorState, TextRegion};
use crate::storage::JobRecord;
use crate::url::{absolutize, slug_from_url};
use crate::ConfigError;
use html_escape::decode_html_entities;
use lol_html::{doc_text, element, HtmlRewriter, Settings};
use std::cell::RefCell;
use std::collections::HashMap;
use url::Url;

/// Records found on one listing page plus the link to the next one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    /// Records in the order their job-boundary tags appeared
    pub records: Vec<JobRecord>,

    /// Absolute URL of the next page; `None` on the last page
    pub next_page: Option<String>,
}

/// Single-pass tag-event extractor for listing pages
///
/// The origin, trigger signatures and attribute translation table are fixed
/// at construction. Only the per-page state is cleared by [`reset`], so one
/// instance can process any number of pages.
///
/// [`reset`]: TagExtractor::reset
#[derive(Debug, Clone)]
pub struct TagExtractor {
    origin: Url,
    triggers: TriggerSet,
    /// Lower-cased attribute name -> record field
    fields: HashMap<String, RecordField>,

    state: ExtractorState,
    records: Vec<JobRecord>,
    next_page: Option<String>,
}

impl TagExtractor {
    /// Creates an extractor for a site
    ///
    /// # Arguments
    ///
    /// * `origin` - Site origin that relative links are resolved against
    /// * `config` - Tag signatures and attribute translation table
    pub fn new(origin: Url, config: &ExtractorConfig) -> Self {
        let fields = config
            .fields
            .iter()
            .map(|(name, field)| (name.trim().to_ascii_lowercase(), *field))
            .collect();

        Self {
            origin,
            triggers: TriggerSet::from_config(config),
            fields,
            state: ExtractorState::Idle,
            records: Vec::new(),
            next_page: None,
        }
    }

    /// Creates an extractor from a full session configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let origin = Url::parse(&config.site.origin).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.site.origin, e))
        })?;
        Ok(Self::new(origin, &config.extractor))
    }

    /// Clears per-page state: the in-progress record, emitted records and
    /// the next-page pointer
    pub fn reset(&mut self) {
        self.state = ExtractorState::Idle;
        self.records.clear();
        self.next_page = None;
    }

    /// Extracts all records and the next-page link from one page
    ///
    /// The extractor is reset first, so the result depends only on `markup`
    /// and the configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use jobsift::config::ExtractorConfig;
    /// use jobsift::crawler::TagExtractor;
    /// use url::Url;
    ///
    /// let origin = Url::parse("https://duunitori.fi").unwrap();
    /// let mut extractor = TagExtractor::new(origin, &ExtractorConfig::default());
    /// let page = extractor.extract(
    ///     r#"<a class="job-box__hover gtm-search-result" href="/tyo/1" data-job-slug="one">
    ///        <h3 class="job-box__title">Analyst</h3></a>"#,
    /// );
    /// assert_eq!(page.records.len(), 1);
    /// assert_eq!(page.records[0].title, "Analyst");
    /// ```
    pub fn extract(&mut self, markup: &str) -> PageResult {
        self.reset();
        self.feed(markup);
        self.finish_page()
    }

    /// Current state of the machine
    pub fn state(&self) -> &ExtractorState {
        &self.state
    }

    /// Runs the tokenizer over a complete page, dispatching tag and text
    /// events in document order
    fn feed(&mut self, markup: &str) {
        let this = RefCell::new(self);
        let pending_text = RefCell::new(String::new());

        let start_tags = element!("*", |el| {
            let mut extractor = this.borrow_mut();
            let name = el.tag_name().to_ascii_lowercase();
            if !extractor.triggers.watches(&name) {
                return Ok(());
            }

            let attributes = el
                .attributes()
                .iter()
                .map(|attr| {
                    (
                        attr.name().to_ascii_lowercase(),
                        decode_html_entities(&attr.value()).into_owned(),
                    )
                })
                .collect();
            extractor.handle_start_tag(&StartTag { name, attributes });
            Ok(())
        });

        // Text arrives in arbitrary chunks; deliver whole text nodes only
        let text_nodes = doc_text!(|chunk| {
            let mut buffer = pending_text.borrow_mut();
            buffer.push_str(chunk.as_str());
            if chunk.last_in_text_node() {
                let text = decode_html_entities(buffer.as_str()).into_owned();
                buffer.clear();
                this.borrow_mut().handle_text(&text);
            }
            Ok(())
        });

        let mut rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![start_tags],
                document_content_handlers: vec![text_nodes],
                strict: false,
                ..Settings::default()
            },
            |_: &[u8]| {},
        );

        if let Err(e) = rewriter.write(markup.as_bytes()) {
            tracing::warn!("Markup tokenizer stopped early: {}", e);
            return;
        }
        if let Err(e) = rewriter.end() {
            tracing::warn!("Markup tokenizer failed at end of page: {}", e);
        }
    }

    /// Handles one opening tag
    pub fn handle_start_tag(&mut self, tag: &StartTag) {
        match self.triggers.classify(tag) {
            Some(TriggerKind::JobBoundary) => {
                let record = self.seed_record(tag);
                if let Some(done) = self.state.begin(record) {
                    self.emit(done);
                }
            }
            Some(TriggerKind::TitleRegion) => self.state.enter_region(TextRegion::Title),
            Some(TriggerKind::PostedRegion) => self.state.enter_region(TextRegion::Posted),
            Some(TriggerKind::NextPage) => {
                if let Some(done) = self.state.finish() {
                    self.emit(done);
                }
                if self.next_page.is_none() {
                    if let Some(href) = tag.attribute("href").filter(|h| !h.trim().is_empty()) {
                        self.next_page = Some(absolutize(&self.origin, href));
                    }
                }
            }
            None => {}
        }
    }

    /// Handles one complete text node
    pub fn handle_text(&mut self, text: &str) {
        if let Some(done) = self.state.accept_text(text) {
            self.emit(done);
        }
    }

    /// Flushes the record in progress and hands out the page's results,
    /// leaving the extractor clean for the next page
    pub fn finish_page(&mut self) -> PageResult {
        if let Some(done) = self.state.finish() {
            self.emit(done);
        }

        PageResult {
            records: std::mem::take(&mut self.records),
            next_page: self.next_page.take(),
        }
    }

    /// Starts a record from the attributes of a job-boundary tag
    fn seed_record(&self, tag: &StartTag) -> JobRecord {
        let mut record = JobRecord::default();

        for (name, value) in &tag.attributes {
            let Some(field) = self.fields.get(name) else {
                continue;
            };
            match field {
                RecordField::Id => record.id = value.trim().to_string(),
                RecordField::Title => record.title = value.clone(),
                RecordField::Category => record.category = value.clone(),
                RecordField::Company => record.company = value.clone(),
                RecordField::Url => record.url = absolutize(&self.origin, value),
                RecordField::Posted => record.posted = last_token(value).to_string(),
            }
        }

        record
    }

    fn emit(&mut self, mut record: JobRecord) {
        if !record.has_key() {
            if let Some(slug) = slug_from_url(&record.url) {
                record.id = slug;
            }
        }
        if record.url.trim().is_empty() {
            record.url = absolutize(&self.origin, "");
        }

        tracing::debug!("Extracted job {} ({})", record.id, record.url);
        self.records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TagExtractor {
        let origin = Url::parse("https://duunitori.fi").unwrap();
        TagExtractor::new(origin, &ExtractorConfig::default())
    }

    fn job_tag(slug: &str, category: &str) -> String {
        format!(
            r#"<a class="job-box__hover gtm-search-result" href="/tyopaikat/tyo/{slug}" data-job-slug="{slug}" data-category="{category}" data-company="Acme Oy">"#
        )
    }

    fn full_job(slug: &str, title: &str, posted: &str) -> String {
        format!(
            r#"<div class="job-box">{}
                 <h3 class="job-box__title">{}</h3>
                 <div class="job-box__content">
                   <span class="job-box__job-posted">{}</span>
                 </div>
               </a></div>"#,
            job_tag(slug, "IT"),
            title,
            posted
        )
    }

    #[test]
    fn test_single_job_scenario() {
        let html = r#"<html><body>
            <a class="job-box__hover gtm-search-result" data-category="Finance" data-company="Acme" href="/job/123">
              <h3 class="job-box__title">Analyst</h3>
              <span class="job-box__job-posted">Posted 2 days ago</span>
            </a>
        </body></html>"#;

        let page = extractor().extract(html);

        assert_eq!(page.records.len(), 1);
        let job = &page.records[0];
        assert_eq!(job.title, "Analyst");
        assert_eq!(job.category, "Finance");
        assert_eq!(job.company, "Acme");
        assert_eq!(job.url, "https://duunitori.fi/job/123");
        assert_eq!(job.posted, "ago");
        // No slug attribute: the id comes from the url path
        assert_eq!(job.id, "123");
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_multiple_complete_jobs_in_order() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            full_job("first-1", "First", "Julkaistu tänään"),
            full_job("second-2", "Second", "Julkaistu 2d"),
            full_job("third-3", "Third", "Julkaistu 5d"),
        );

        let page = extractor().extract(&html);

        let ids: Vec<&str> = page.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first-1", "second-2", "third-3"]);
        assert_eq!(page.records[0].posted, "tänään");
        assert_eq!(page.records[1].title, "Second");
        assert_eq!(page.records[2].company, "Acme Oy");
    }

    #[test]
    fn test_boundaries_without_subregions_are_not_lost() {
        let html = format!(
            "{}</a>{}<h3 class=\"job-box__title\">Only title</h3></a>{}",
            job_tag("a-1", "IT"),
            job_tag("b-2", "IT"),
            job_tag("c-3", "Sales"),
        );

        let page = extractor().extract(&html);

        assert_eq!(page.records.len(), 3);
        assert_eq!(page.records[0].title, "");
        assert_eq!(page.records[1].title, "Only title");
        assert_eq!(page.records[1].posted, "");
        assert_eq!(page.records[2].category, "Sales");
    }

    #[test]
    fn test_job_without_href_gets_origin_url() {
        let html = r#"<a class="job-box__hover gtm-search-result" data-job-slug="no-href-1">
              <h3 class="job-box__title">Analyst</h3>
              <span class="job-box__job-posted">Julkaistu tänään</span>
            </a>"#;

        let page = extractor().extract(html);

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "no-href-1");
        assert_eq!(page.records[0].url, "https://duunitori.fi/");
        assert!(Url::parse(&page.records[0].url).is_ok());
    }

    #[test]
    fn test_next_page_link() {
        let html = format!(
            r#"<html><head><link rel="next" href="/tyopaikat?sivu=2&amp;order_by=date_posted"></head>
               <body>{}</body></html>"#,
            full_job("x-1", "X", "tänään")
        );

        let page = extractor().extract(&html);

        assert_eq!(page.records.len(), 1);
        assert_eq!(
            page.next_page.as_deref(),
            Some("https://duunitori.fi/tyopaikat?sivu=2&order_by=date_posted")
        );
    }

    #[test]
    fn test_only_first_next_link_is_honored() {
        let html = r#"<link rel="next" href="https://duunitori.fi/p2"><link rel="next" href="https://duunitori.fi/p9">"#;
        let page = extractor().extract(html);
        assert_eq!(page.next_page.as_deref(), Some("https://duunitori.fi/p2"));
    }

    #[test]
    fn test_next_link_flushes_record_in_progress() {
        let html = format!(
            r#"{}<h3 class="job-box__title">Pending</h3><link rel="next" href="/p2"><span class="job-box__job-posted">tänään</span>"#,
            job_tag("pending-1", "IT")
        );

        let page = extractor().extract(&html);

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].title, "Pending");
        // The posted text arrived after the record was flushed
        assert_eq!(page.records[0].posted, "");
        assert_eq!(page.next_page.as_deref(), Some("https://duunitori.fi/p2"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = r#"<a class="job-box__hover gtm-search-result" href="/tyo/1" data-job-slug="one" data-company="Smith &amp; Sons">
               <h3 class="job-box__title">R&amp;D engineer</h3></a>"#;

        let page = extractor().extract(html);

        assert_eq!(page.records[0].company, "Smith & Sons");
        assert_eq!(page.records[0].title, "R&D engineer");
    }

    #[test]
    fn test_title_text_is_kept_verbatim() {
        let html = format!(
            r#"{}<h3 class="job-box__title">  Senior   developer </h3></a>"#,
            job_tag("dev-1", "IT")
        );
        let page = extractor().extract(&html);
        assert_eq!(page.records[0].title, "  Senior   developer ");
    }

    #[test]
    fn test_reextraction_is_idempotent() {
        let html = format!(
            "<link rel=\"next\" href=\"/p2\">{}{}",
            full_job("a-1", "A", "tänään"),
            job_tag("b-2", "IT")
        );

        let mut extractor = extractor();
        let first = extractor.extract(&html);
        let second = extractor.extract(&html);

        assert_eq!(first, second);
        assert_eq!(first.records.len(), 2);
    }

    #[test]
    fn test_reset_prevents_leaks_between_pages() {
        let mut extractor = extractor();

        // Feed events by hand and stop mid-record
        extractor.handle_start_tag(&StartTag::new(
            "a",
            &[
                ("class", "job-box__hover gtm-search-result"),
                ("href", "/tyo/dangling"),
                ("data-job-slug", "dangling"),
            ],
        ));
        assert!(extractor.state().in_job());

        let page = extractor.extract(&full_job("clean-1", "Clean", "tänään"));

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "clean-1");
        assert!(!extractor.state().in_job());
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let inputs = [
            "",
            "<<<>>>",
            "<a class=\"job-box__hover gtm-search-result\" href=\"/tyo/1\" data-job-slug=\"one",
            "<div><span class=\"job-box__job-posted\">orphan</span>&bogus; &#xZZ;</p></div>",
            "<a class='job-box__hover gtm-search-result' href='/tyo/2' data-job-slug='two'><h3 class='job-box__title'>",
        ];

        for input in inputs {
            let page = extractor().extract(input);
            assert!(page.records.len() <= 1, "input {:?}", input);
            assert_eq!(page.next_page, None);
        }
    }

    #[test]
    fn test_unterminated_title_region_still_emits() {
        let html = "<a class='job-box__hover gtm-search-result' href='/tyo/2' data-job-slug='two'><h3 class='job-box__title'>";
        let page = extractor().extract(html);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "two");
        assert_eq!(page.records[0].url, "https://duunitori.fi/tyo/2");
    }

    #[test]
    fn test_custom_signatures_and_fields() {
        let mut config = ExtractorConfig::default();
        config.job = crate::config::SignatureConfig::new("article", "class", "listing");
        config.fields = [
            ("data-id".to_string(), RecordField::Id),
            ("data-link".to_string(), RecordField::Url),
            ("data-when".to_string(), RecordField::Posted),
        ]
        .into_iter()
        .collect();

        let origin = Url::parse("https://jobs.example.com").unwrap();
        let mut extractor = TagExtractor::new(origin, &config);
        let page = extractor.extract(
            r#"<article class="card listing" data-id="J-7" data-link="/j/7" data-when="Posted yesterday"></article>"#,
        );

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "J-7");
        assert_eq!(page.records[0].url, "https://jobs.example.com/j/7");
        assert_eq!(page.records[0].posted, "yesterday");
    }
}
