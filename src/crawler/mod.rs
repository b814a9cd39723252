//! Crawler module for listing page fetching and record extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a browser-like identity
//! - Streaming tag-event extraction of job records
//! - Politeness delay between pages
//! - The incremental crawl loop with early stop

mod controller;
mod extractor;
mod fetcher;
mod pacing;
mod signature;

pub use controller::{CrawlController, CrawlOutcome, StopReason};
pub use extractor::{PageResult, TagExtractor};
pub use fetcher::{
    browser_user_agent, build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher,
};
pub use pacing::Pacing;
pub use signature::{StartTag, TagSignature, TriggerKind, TriggerSet};

use crate::config::Config;
use crate::storage::RecordStore;
use crate::SiftError;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Runs one refresh session against the configured site
///
/// Loads the dataset, crawls at most `max_pages` pages, persists the merged
/// dataset and returns it with the session summary.
///
/// # Arguments
///
/// * `config` - The validated session configuration
/// * `max_pages` - Upper bound on fetches for this session
/// * `cancel` - Token that interrupts the inter-page delay
///
/// # Returns
///
/// * `Ok((RecordStore, CrawlOutcome))` - The dataset after the session
/// * `Err(SiftError)` - The dataset could not be loaded or saved
pub async fn refresh_dataset(
    config: &Config,
    max_pages: u32,
    cancel: CancellationToken,
) -> Result<(RecordStore, CrawlOutcome), SiftError> {
    let dataset_path = Path::new(&config.output.dataset_path);
    let store = RecordStore::load(dataset_path)?;
    tracing::info!(
        "Loaded {} known jobs from {}",
        store.len(),
        dataset_path.display()
    );

    let fetcher = HttpFetcher::new(&config.crawler)?;
    let extractor = TagExtractor::from_config(config)?;

    let mut controller =
        CrawlController::new(fetcher, extractor, store, config.site.start_url.clone())
            .with_pacing(Pacing::from_config(&config.crawler))
            .persist_to(dataset_path)
            .with_cancellation(cancel);

    let outcome = controller.crawl(max_pages).await?;
    Ok((controller.into_store(), outcome))
}
