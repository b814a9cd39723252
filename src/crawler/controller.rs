//! Crawl controller - the incremental, newest-first crawl loop
//!
//! One session walks the listing pages in order:
//! - fetch the page markup through the injected [`PageFetcher`]
//! - extract records and the next-page link
//! - keep only records whose key is not yet stored
//! - append them to the store and persist it
//!
//! The loop stops at the page limit, when there is no next page, when the
//! delay is cancelled, or when a page after the first contains nothing new.
//! The listing is sorted newest first, so an all-duplicate page means the
//! rest of the listing has been harvested before. If the site ever breaks
//! that ordering, out-of-order new listings behind such a page are missed.

use crate::crawler::extractor::TagExtractor;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::pacing::Pacing;
use crate::storage::{session_timestamp, RecordStore, StorageResult};
use chrono::Local;
use std::fmt;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Why a crawl session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The last fetched page had no next-page link (or could not be fetched)
    NoNextPage,

    /// `max_pages` pages were fetched
    PageLimit,

    /// A page after the first held only already-known records
    NoNewRecords,

    /// The inter-page delay was cancelled
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoNextPage => "no next page",
            Self::PageLimit => "page limit reached",
            Self::NoNewRecords => "no new jobs",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{}", text)
    }
}

/// Summary of one crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Number of fetches performed (never more than `max_pages`)
    pub pages_fetched: u32,

    /// Pages that contributed at least one new record
    pub pages_with_output: u32,

    /// Records appended to the store
    pub records_added: usize,

    pub stop: StopReason,
}

impl CrawlOutcome {
    /// Returns true if at least one page yielded new records
    pub fn yielded_output(&self) -> bool {
        self.pages_with_output > 0
    }
}

/// Drives fetch -> extract -> dedup -> append cycles for one site
///
/// All mutation happens inside [`crawl`](CrawlController::crawl) on a single
/// task; pages are never fetched concurrently because the stop decision for
/// page `k + 1` depends on what page `k` contained.
pub struct CrawlController<F> {
    fetcher: F,
    extractor: TagExtractor,
    store: RecordStore,
    start_url: String,
    pacing: Pacing,
    dataset_path: Option<PathBuf>,
    cancel: CancellationToken,
}

impl<F: PageFetcher> CrawlController<F> {
    /// Creates a controller with no delay and no persistence
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Page source
    /// * `extractor` - Configured tag extractor for the site
    /// * `store` - Records loaded at session start
    /// * `start_url` - First listing page
    pub fn new(
        fetcher: F,
        extractor: TagExtractor,
        store: RecordStore,
        start_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            start_url: start_url.into(),
            pacing: Pacing::none(),
            dataset_path: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Persists the store to `path` after every appended batch
    pub fn persist_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(path.into());
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Runs one crawl session of at most `max_pages` fetches
    ///
    /// Only persistence can fail; fetch failures and malformed pages just
    /// yield pages without records.
    pub async fn crawl(&mut self, max_pages: u32) -> StorageResult<CrawlOutcome> {
        self.store.set_last_refresh(session_timestamp(&Local::now()));

        let mut pages_fetched = 0u32;
        let mut pages_with_output = 0u32;
        let mut records_added = 0usize;
        let mut url = Some(self.start_url.clone());

        let stop = loop {
            let Some(current) = url.take() else {
                break StopReason::NoNextPage;
            };

            if pages_fetched >= max_pages {
                break StopReason::PageLimit;
            }

            if pages_fetched > 0 && !self.pacing.wait(&self.cancel).await {
                tracing::info!("Crawl cancelled before page {}", pages_fetched + 1);
                break StopReason::Cancelled;
            }

            let body = self.fetcher.fetch(&current).await.into_body();
            pages_fetched += 1;

            let page = self.extractor.extract(&body);
            let fresh = self.store.unseen(&page.records);

            if fresh.is_empty() && pages_fetched > 1 {
                tracing::info!(
                    "No new jobs on page {} ({} listed), stopping",
                    pages_fetched,
                    page.records.len()
                );
                break StopReason::NoNewRecords;
            }

            let added = self.store.append(fresh);
            if added > 0 {
                pages_with_output += 1;
                records_added += added;
                self.persist()?;
            }

            tracing::info!(
                "Page {}/{} done: {} new of {} listed",
                pages_fetched,
                max_pages,
                added,
                page.records.len()
            );

            url = page.next_page;
        };

        self.persist()?;

        let outcome = CrawlOutcome {
            pages_fetched,
            pages_with_output,
            records_added,
            stop,
        };
        tracing::info!(
            "Crawl finished ({}): {} pages fetched, {} new jobs",
            outcome.stop,
            outcome.pages_fetched,
            outcome.records_added
        );
        Ok(outcome)
    }

    fn persist(&self) -> StorageResult<()> {
        match &self.dataset_path {
            Some(path) => self.store.save(path),
            None => Ok(()),
        }
    }
}
