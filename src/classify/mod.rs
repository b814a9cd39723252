//! Blacklist filtering and buzzword tagging
//!
//! [`Classifier::classify`] turns the record store into a [`FilteredView`]:
//! records whose category or company is blacklisted are left out, and every
//! remaining record carries a buzz flag. The view owns its data and is never
//! mutated after construction, so report generation can read it freely.

mod buzz;
mod rules;

pub use buzz::BuzzMatcher;
pub use rules::{BlacklistRules, BUZZWORDS, CATEGORIES, COMPANIES};

use crate::config::ClassifierConfig;
use crate::storage::{JobRecord, RecordStore};
use std::collections::BTreeMap;

/// A record that survived filtering, with its buzz flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRecord {
    pub record: JobRecord,
    pub buzz: bool,
}

/// Read-only, blacklist-filtered and buzz-tagged projection of a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    records: Vec<ClassifiedRecord>,
    excluded: usize,
    last_refresh: Option<String>,
}

impl FilteredView {
    /// Surviving records in store order
    pub fn records(&self) -> &[ClassifiedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records left out by the blacklist
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    pub fn buzz_count(&self) -> usize {
        self.records.iter().filter(|r| r.buzz).count()
    }

    /// Refresh timestamp of the store the view was built from
    pub fn last_refresh(&self) -> Option<&str> {
        self.last_refresh.as_deref()
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.by_category().into_keys().collect()
    }

    /// Records grouped by exact category value, categories sorted
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&ClassifiedRecord>> {
        let mut groups: BTreeMap<&str, Vec<&ClassifiedRecord>> = BTreeMap::new();
        for classified in &self.records {
            groups
                .entry(classified.record.category.as_str())
                .or_default()
                .push(classified);
        }
        groups
    }
}

/// Returns true if any record in the slice is buzz-tagged
pub fn any_buzz(records: &[&ClassifiedRecord]) -> bool {
    records.iter().any(|r| r.buzz)
}

/// Applies blacklist rules and buzzword tagging
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: BlacklistRules,
    matcher: BuzzMatcher,
}

impl Classifier {
    pub fn new(rules: BlacklistRules, config: &ClassifierConfig) -> Self {
        let matcher = BuzzMatcher::from_config(config, rules.buzzwords());
        Self { rules, matcher }
    }

    pub fn rules(&self) -> &BlacklistRules {
        &self.rules
    }

    /// Returns true if the record's category or company is blacklisted
    pub fn is_excluded(&self, record: &JobRecord) -> bool {
        self.rules.contains(CATEGORIES, &record.category)
            || self.rules.contains(COMPANIES, &record.company)
    }

    pub fn is_buzz(&self, record: &JobRecord) -> bool {
        self.matcher.matches(record)
    }

    /// Builds the filtered view of a store
    pub fn classify(&self, store: &RecordStore) -> FilteredView {
        self.build(store, true)
    }

    /// Builds a view that keeps every record but still computes buzz flags
    pub fn tag_all(&self, store: &RecordStore) -> FilteredView {
        self.build(store, false)
    }

    fn build(&self, store: &RecordStore, filter: bool) -> FilteredView {
        let mut records = Vec::with_capacity(store.len());
        let mut excluded = 0;

        for record in store.records() {
            if filter && self.is_excluded(record) {
                excluded += 1;
                continue;
            }
            records.push(ClassifiedRecord {
                buzz: self.is_buzz(record),
                record: record.clone(),
            });
        }

        tracing::debug!(
            "Classified {} records: {} kept, {} excluded",
            store.len(),
            records.len(),
            excluded
        );

        FilteredView {
            records,
            excluded,
            last_refresh: store.last_refresh().map(str::to_string),
        }
    }
}
