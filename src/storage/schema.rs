//! Backing artifact layout
//!
//! ```text
//! #Updated,2024-05-01T081500
//! posted,title,category,company,url,slug
//! today,Analyst,Finance,Acme,https://duunitori.fi/tyopaikat/tyo/analyst-123,analyst-123
//! ```
//!
//! Line 1 is a comment-prefixed key/value pair carrying the time the last
//! crawl session started. The rest is a standard CSV table with a header.

use chrono::{DateTime, TimeZone};

/// Marks the refresh line (and nothing else) in the artifact
pub const COMMENT_MARKER: char = '#';

/// Key of the refresh key/value pair
pub const REFRESH_KEY: &str = "Updated";

/// Header row, in `JobRecord` field order
pub const COLUMNS: [&str; 6] = ["posted", "title", "category", "company", "url", "slug"];

/// Refresh timestamps double as report file name prefixes, so no colons
pub const REFRESH_FORMAT: &str = "%Y-%m-%dT%H%M%S";

/// Formats the first line of the artifact
pub fn format_refresh_line(timestamp: &str) -> String {
    format!("{}{},{}", COMMENT_MARKER, REFRESH_KEY, timestamp)
}

/// Extracts the refresh timestamp from a comment line
///
/// Returns `None` when the line is not a comment or carries no value.
pub fn parse_refresh_line(line: &str) -> Option<String> {
    let body = line.trim().strip_prefix(COMMENT_MARKER)?;
    let value = body.rsplit(',').next()?.trim();
    if value.is_empty() || value == body.trim() {
        return None;
    }
    Some(value.to_string())
}

/// Renders a session start time in the artifact's timestamp format
pub fn session_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(REFRESH_FORMAT).to_string()
}
