//! Configuration module for Jobsift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every path, URL, tag signature and column rule a session needs lives in
//! one [`Config`] value handed to the crawler and the store at construction.
//!
//! # Example
//!
//! ```no_run
//! use jobsift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("jobsift.toml")).unwrap();
//! println!("Crawling from: {}", config.site.start_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BuzzField, ClassifierConfig, Config, CrawlerConfig, ExtractorConfig, OutputConfig,
    RecordField, SignatureConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
