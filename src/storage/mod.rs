//! Storage module for the persisted job dataset
//!
//! This module handles the backing artifact that survives between sessions:
//! - The `JobRecord` row type and its stable column order
//! - Reading the artifact (refresh marker line, header, CSV rows)
//! - Key-based deduplication of incoming batches
//! - Atomic whole-file persistence

mod error;
mod record_store;
mod schema;

pub use error::{StorageError, StorageResult};
pub use record_store::RecordStore;
pub use schema::{format_refresh_line, parse_refresh_line, session_timestamp, COLUMNS};

use serde::{Deserialize, Serialize};

/// One job listing
///
/// Field order is the column order of the backing artifact. The id column is
/// called `slug` on disk, after the site token it is derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Human-readable recency token ("today", "3d", ...)
    #[serde(default)]
    pub posted: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub company: String,

    /// Absolute listing URL
    #[serde(default)]
    pub url: String,

    /// Unique site-provided slug
    #[serde(rename = "slug")]
    pub id: String,
}

impl JobRecord {
    /// Dedup key: the id, lower-cased
    pub fn key(&self) -> String {
        self.id.trim().to_lowercase()
    }

    /// Returns true if the record carries a usable dedup key
    pub fn has_key(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
