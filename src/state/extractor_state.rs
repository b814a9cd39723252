/// Extraction state for one page of listing markup
///
/// The listing markup has no explicit "job end" tag, so a record stays open
/// until the posted-date text arrives, a sibling job tag or the next-page
/// link appears, or the page ends. Every transition that leaves a job hands
/// the in-progress record back to the caller, which is how the extractor
/// guarantees that no record is dropped or overwritten.
use crate::storage::JobRecord;
use std::fmt;

/// Sub-field region whose next text event fills one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRegion {
    Title,
    Posted,
}

/// Where the extractor is in the current page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtractorState {
    /// Outside any job markup
    #[default]
    Idle,

    /// Inside a job, waiting for a sub-field region
    InJob(JobRecord),

    /// The next non-blank text event is the job title
    InJobTitleText(JobRecord),

    /// The next non-blank text event is the posted-date label
    InJobPostedText(JobRecord),
}

impl ExtractorState {
    /// Starts a new record, returning the one in progress (if any)
    pub fn begin(&mut self, record: JobRecord) -> Option<JobRecord> {
        let previous = self.finish();
        *self = Self::InJob(record);
        previous
    }

    /// Enters a title or posted-date region
    ///
    /// Regions only mean something inside a job; in `Idle` this is a no-op.
    /// Opening a region while another is still pending replaces it.
    pub fn enter_region(&mut self, region: TextRegion) {
        let record = match std::mem::take(self) {
            Self::Idle => return,
            Self::InJob(record) | Self::InJobTitleText(record) | Self::InJobPostedText(record) => {
                record
            }
        };

        *self = match region {
            TextRegion::Title => Self::InJobTitleText(record),
            TextRegion::Posted => Self::InJobPostedText(record),
        };
    }

    /// Feeds one complete text event
    ///
    /// Returns the finished record when the text completed it, i.e. when it
    /// was the posted-date text. Whitespace-only text never fills a field.
    pub fn accept_text(&mut self, text: &str) -> Option<JobRecord> {
        if text.trim().is_empty() || !self.is_capturing_text() {
            return None;
        }

        match std::mem::take(self) {
            Self::InJobTitleText(mut record) => {
                record.title = text.to_string();
                *self = Self::InJob(record);
                None
            }
            Self::InJobPostedText(mut record) => {
                record.posted = last_token(text).to_string();
                Some(record)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Closes the current job, returning its record (if any)
    pub fn finish(&mut self) -> Option<JobRecord> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::InJob(record) | Self::InJobTitleText(record) | Self::InJobPostedText(record) => {
                Some(record)
            }
        }
    }

    /// Returns true while a record is being assembled
    pub fn in_job(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns true if the next text event would be captured
    pub fn is_capturing_text(&self) -> bool {
        matches!(self, Self::InJobTitleText(_) | Self::InJobPostedText(_))
    }

    /// Short name of the state, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InJob(_) => "in_job",
            Self::InJobTitleText(_) => "in_job_title_text",
            Self::InJobPostedText(_) => "in_job_posted_text",
        }
    }
}

impl fmt::Display for ExtractorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Last whitespace-delimited token of `text` ("Posted 3d" -> "3d")
pub fn last_token(text: &str) -> &str {
    text.split_whitespace().last().unwrap_or("")
}
