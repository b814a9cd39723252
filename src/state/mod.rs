//! State module for markup extraction
//!
//! # Components
//!
//! - `ExtractorState`: where the tag extractor is within one page of listing
//!   markup, carrying the record being assembled
//! - `TextRegion`: the sub-field regions that capture the next text event

mod extractor_state;

// Re-export main types
pub use extractor_state::{last_token, ExtractorState, TextRegion};
