//! Statistics over the persisted dataset
//!
//! This module provides functionality for summarizing the dataset and its
//! classified view, and for printing the summary (`--stats`).

use crate::classify::FilteredView;
use crate::storage::RecordStore;
use std::collections::BTreeMap;

/// Dataset statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetStatistics {
    /// Records in the dataset
    pub total_records: usize,

    /// Records left after blacklist filtering
    pub kept: usize,

    /// Records excluded by the blacklist
    pub excluded: usize,

    /// Kept records carrying the buzz tag
    pub buzz_tagged: usize,

    /// Kept records per category
    pub per_category: BTreeMap<String, usize>,

    /// Start of the session that last refreshed the dataset
    pub last_refresh: Option<String>,
}

impl DatasetStatistics {
    /// Collects statistics from a store and the view classified from it
    pub fn collect(store: &RecordStore, view: &FilteredView) -> Self {
        let per_category = view
            .by_category()
            .into_iter()
            .map(|(category, records)| (category.to_string(), records.len()))
            .collect();

        Self {
            total_records: store.len(),
            kept: view.len(),
            excluded: view.excluded(),
            buzz_tagged: view.buzz_count(),
            per_category,
            last_refresh: store.last_refresh().map(str::to_string),
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &DatasetStatistics) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!(
        "  Last refresh: {}",
        stats.last_refresh.as_deref().unwrap_or("never")
    );
    println!("  Total jobs: {}", stats.total_records);
    println!("  Kept: {}", stats.kept);
    println!("  Excluded by blacklist: {}", stats.excluded);
    println!("  Buzz tagged: {}", stats.buzz_tagged);
    println!();

    if !stats.per_category.is_empty() {
        println!("Jobs by Category:");
        // Sort categories by count (descending)
        let mut counts: Vec<_> = stats.per_category.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (category, count) in counts {
            let percentage = if stats.kept > 0 {
                (*count as f64 / stats.kept as f64) * 100.0
            } else {
                0.0
            };
            let label = if category.is_empty() { "(blank)" } else { category };
            println!("  {}: {} ({:.1}%)", label, count, percentage);
        }
        println!();
    }
}
