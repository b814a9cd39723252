//! Jobsift: an incremental job-listing harvester
//!
//! This crate crawls a paginated, newest-first job listing site, extracts
//! job records from the raw markup with a streaming tag-event state machine,
//! merges them into a persisted dataset with at-most-once-per-key semantics,
//! and turns the blacklist-filtered, buzzword-tagged result into a
//! multi-sheet spreadsheet report.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Jobsift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Covers both the TOML settings file and the blacklist rules file. Either
/// one being missing or malformed ends the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Failed to read rules file {path}: {source}")]
    RulesIo {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed rules file at line {line}: {message}")]
    MalformedRules { line: usize, message: String },
}

/// Result type alias for Jobsift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use classify::{BlacklistRules, Classifier, FilteredView};
pub use config::Config;
pub use crawler::{CrawlController, CrawlOutcome, PageResult, TagExtractor};
pub use state::ExtractorState;
pub use storage::{JobRecord, RecordStore};
