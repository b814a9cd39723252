//! Politeness delay between page fetches
//!
//! Pages are fetched strictly one after another. Between two fetches the
//! crawl loop sleeps for a base delay plus an optional random jitter, and the
//! sleep can be cut short by a cancellation token (Ctrl-C).

use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Delay policy for consecutive requests to the listing site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    base: Duration,
    jitter: Duration,
}

impl Pacing {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// No delay at all (tests, local fixtures)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.delay_ms),
            Duration::from_millis(config.delay_jitter_ms),
        )
    }

    /// Picks the next delay: base plus a uniform draw from `0..=jitter`
    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }

        let jitter_ms = self.jitter.as_millis() as u64;
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.base + Duration::from_millis(extra)
    }

    /// Sleeps for the next delay unless cancelled first
    ///
    /// Returns `false` if the token was (or became) cancelled, meaning the
    /// crawl should stop instead of fetching another page.
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }

        let delay = self.next_delay();
        if delay.is_zero() {
            return true;
        }

        tracing::debug!("Waiting {:?} before next page", delay);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}
