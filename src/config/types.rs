use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Jobsift
///
/// One value describes one listing site. Nothing here is process-global, so
/// two sessions with different configs never share state.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// The listing site being harvested
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host prefixed to relative links found in the markup
    pub origin: String,

    /// First listing page, sorted newest first
    #[serde(rename = "start-url")]
    pub start_url: String,
}

/// Crawl loop behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Upper bound on page fetches per session
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random extra pause added on top of `delay_ms` (milliseconds)
    #[serde(rename = "delay-jitter-ms", default)]
    pub delay_jitter_ms: u64,

    /// Whole-request timeout for a single page fetch
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: 0,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// A (tag, attribute, value) triple recognised on an opening tag
///
/// `value` is a whitespace-separated token list; every token must be present
/// in the attribute's own token list for the tag to match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignatureConfig {
    pub tag: String,
    pub attribute: String,
    pub value: String,
}

impl SignatureConfig {
    pub fn new(tag: &str, attribute: &str, value: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

/// Record fields an attribute on the job-boundary tag can seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordField {
    #[serde(alias = "slug")]
    Id,
    Title,
    Category,
    Company,
    Url,
    Posted,
}

/// Tag signatures and the attribute translation table
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_job_signature")]
    pub job: SignatureConfig,

    #[serde(default = "default_title_signature")]
    pub title: SignatureConfig,

    #[serde(default = "default_posted_signature")]
    pub posted: SignatureConfig,

    #[serde(rename = "next-page", default = "default_next_signature")]
    pub next_page: SignatureConfig,

    /// Attribute name on the job-boundary tag -> record field
    #[serde(default = "default_fields")]
    pub fields: BTreeMap<String, RecordField>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            job: default_job_signature(),
            title: default_title_signature(),
            posted: default_posted_signature(),
            next_page: default_next_signature(),
            fields: default_fields(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the persisted dataset (CSV backing artifact)
    #[serde(rename = "dataset-path", default = "default_dataset_path")]
    pub dataset_path: String,

    /// Path of the spreadsheet report; the file name gets a refresh prefix
    #[serde(rename = "report-path", default = "default_report_path")]
    pub report_path: String,

    /// Path to the blacklist/buzzword rules file
    #[serde(rename = "rules-path", default = "default_rules_path")]
    pub rules_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            report_path: default_report_path(),
            rules_path: default_rules_path(),
        }
    }
}

/// Which record text the buzzword matcher scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuzzField {
    #[serde(alias = "id")]
    Slug,
    Title,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(rename = "buzz-field", default = "default_buzz_field")]
    pub buzz_field: BuzzField,

    /// Token boundary used when matching buzzwords
    #[serde(rename = "buzz-delimiter", default = "default_buzz_delimiter")]
    pub buzz_delimiter: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            buzz_field: default_buzz_field(),
            buzz_delimiter: default_buzz_delimiter(),
        }
    }
}

fn default_max_pages() -> u32 {
    30
}

fn default_delay_ms() -> u64 {
    3000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_job_signature() -> SignatureConfig {
    SignatureConfig::new("a", "class", "job-box__hover gtm-search-result")
}

fn default_title_signature() -> SignatureConfig {
    SignatureConfig::new("h3", "class", "job-box__title")
}

fn default_posted_signature() -> SignatureConfig {
    SignatureConfig::new("span", "class", "job-box__job-posted")
}

fn default_next_signature() -> SignatureConfig {
    SignatureConfig::new("link", "rel", "next")
}

fn default_fields() -> BTreeMap<String, RecordField> {
    BTreeMap::from([
        ("data-job-slug".to_string(), RecordField::Id),
        ("data-category".to_string(), RecordField::Category),
        ("data-company".to_string(), RecordField::Company),
        ("href".to_string(), RecordField::Url),
    ])
}

fn default_dataset_path() -> String {
    "jobs.csv".to_string()
}

fn default_report_path() -> String {
    "jobs.xlsx".to_string()
}

fn default_rules_path() -> String {
    ".blacklist.dat".to_string()
}

fn default_buzz_field() -> BuzzField {
    BuzzField::Slug
}

fn default_buzz_delimiter() -> String {
    "-".to_string()
}
