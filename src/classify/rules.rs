//! Blacklist rules file loading
//!
//! The rules file is plain UTF-8 text. A line starting with `#` opens a
//! named rule set; every following non-empty line, up to the next `#` line,
//! is one lower-cased token of that set:
//!
//! ```text
//! #categories
//! Sales
//! #companies
//! Acme Oy
//! #buzzwords
//! rust
//! ```

use crate::{ConfigError, ConfigResult};
use std::collections::{HashMap, HashSet};
use std::path::Path;

const SET_MARKER: char = '#';

/// Rule set holding excluded categories
pub const CATEGORIES: &str = "categories";

/// Rule set holding excluded companies
pub const COMPANIES: &str = "companies";

/// Rule set holding buzzwords
pub const BUZZWORDS: &str = "buzzwords";

/// Named sets of lower-cased tokens, read once per session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistRules {
    sets: HashMap<String, HashSet<String>>,
}

impl BlacklistRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads rules from a file
    ///
    /// A missing or unreadable file is an error: reports must never be
    /// produced with filtering silently disabled.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::RulesIo {
            path: path.display().to_string(),
            source,
        })?;

        let rules = Self::parse(&content)?;
        tracing::debug!(
            "Loaded rules from {}: {} categories, {} companies, {} buzzwords",
            path.display(),
            rules.categories().len(),
            rules.companies().len(),
            rules.buzzwords().len()
        );
        Ok(rules)
    }

    /// Parses rules file content
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedRules` if a token appears before the
    /// first set header or a header has no name.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let mut rules = Self::new();
        let mut current: Option<String> = None;

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim().trim_start_matches('\u{feff}');
            if line.is_empty() {
                continue;
            }

            if let Some(name) = line.strip_prefix(SET_MARKER) {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ConfigError::MalformedRules {
                        line: index + 1,
                        message: "rule set header without a name".to_string(),
                    });
                }
                // A repeated header starts the set over
                rules.sets.insert(name.to_string(), HashSet::new());
                current = Some(name.to_string());
                continue;
            }

            match &current {
                Some(name) => rules.insert(name, line),
                None => {
                    return Err(ConfigError::MalformedRules {
                        line: index + 1,
                        message: format!("token '{}' before any rule set header", line),
                    })
                }
            }
        }

        Ok(rules)
    }

    /// Adds a token (lower-cased) to a set, creating the set if needed
    pub fn insert(&mut self, set: &str, token: &str) {
        self.sets
            .entry(set.to_string())
            .or_default()
            .insert(token.to_lowercase());
    }

    /// Tokens of a named set; unknown sets are empty
    pub fn set(&self, name: &str) -> Option<&HashSet<String>> {
        self.sets.get(name)
    }

    pub fn categories(&self) -> HashSet<&str> {
        self.tokens(CATEGORIES)
    }

    pub fn companies(&self) -> HashSet<&str> {
        self.tokens(COMPANIES)
    }

    pub fn buzzwords(&self) -> HashSet<&str> {
        self.tokens(BUZZWORDS)
    }

    /// Returns true if the lower-cased value is in the named set
    pub fn contains(&self, set: &str, value: &str) -> bool {
        self.sets
            .get(set)
            .is_some_and(|tokens| tokens.contains(&value.to_lowercase()))
    }

    fn tokens(&self, name: &str) -> HashSet<&str> {
        self.sets
            .get(name)
            .map(|tokens| tokens.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
