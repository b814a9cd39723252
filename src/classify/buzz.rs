//! Buzzword tagging
//!
//! A record is buzz-tagged when the configured text field contains a
//! buzzword as a whole delimiter-bounded segment. With the default `-`
//! delimiter the slug `senior-rust-developer-123` matches `rust` but not
//! `rus`, and a multi-segment buzzword such as `machine-learning` also
//! matches.

use crate::config::{BuzzField, ClassifierConfig};
use crate::storage::JobRecord;

/// Matches one record field against a buzzword list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuzzMatcher {
    field: BuzzField,
    delimiter: String,
    needles: Vec<String>,
}

impl BuzzMatcher {
    /// Builds a matcher
    ///
    /// Buzzwords are lower-cased; blank ones are dropped since they would
    /// match every field.
    pub fn new<'a, I>(field: BuzzField, delimiter: &str, buzzwords: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut needles: Vec<String> = buzzwords
            .into_iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .map(|word| format!("{delimiter}{word}{delimiter}"))
            .collect();
        needles.sort();
        needles.dedup();

        Self {
            field,
            delimiter: delimiter.to_string(),
            needles,
        }
    }

    pub fn from_config<'a, I>(config: &ClassifierConfig, buzzwords: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(config.buzz_field, &config.buzz_delimiter, buzzwords)
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }

    /// Returns true if the record's field holds any buzzword segment
    pub fn matches(&self, record: &JobRecord) -> bool {
        if self.needles.is_empty() {
            return false;
        }

        let value = match self.field {
            BuzzField::Slug => &record.id,
            BuzzField::Title => &record.title,
        };
        let haystack = format!("{}{}{}", self.delimiter, value.to_lowercase(), self.delimiter);

        self.needles.iter().any(|needle| haystack.contains(needle.as_str()))
    }
}
