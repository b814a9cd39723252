//! URL and attribute-token helpers for Jobsift
//!
//! This module turns relative links found in listing markup into absolute
//! URLs, derives fallback slugs from listing URLs, and matches
//! whitespace-separated attribute token lists.

mod matcher;
mod resolve;

// Re-export main functions
pub use matcher::contains_tokens;
pub use resolve::{absolutize, slug_from_url};
