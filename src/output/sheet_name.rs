//! Worksheet naming rules
//!
//! Spreadsheet sheet names are at most 31 characters, cannot contain any of
//! `[ ] : * ? / \`, cannot start or end with an apostrophe, must be unique
//! ignoring case, and `History` is reserved.

use std::collections::HashSet;

/// Maximum sheet name length, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Name used for a category that is empty after sanitizing
pub const BLANK_SHEET_NAME: &str = "(blank)";

const INVALID_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

const RESERVED_NAMES: [&str; 1] = ["history"];

/// Makes a category usable as a sheet name
///
/// Illegal characters become spaces, the result is cut to 31 characters and
/// stripped of edge apostrophes.
///
/// # Example
///
/// ```
/// use jobsift::output::sanitize_sheet_name;
///
/// assert_eq!(sanitize_sheet_name("IT/Tietoliikenne"), "IT Tietoliikenne");
/// assert_eq!(sanitize_sheet_name(""), "(blank)");
/// ```
pub fn sanitize_sheet_name(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if INVALID_CHARS.contains(&c) { ' ' } else { c })
        .collect();
    let truncated = truncate_chars(&replaced, MAX_SHEET_NAME_LEN);
    let trimmed = truncated.trim_matches('\'');

    if trimmed.trim().is_empty() {
        BLANK_SHEET_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}

/// Hands out unique sheet names for one workbook
#[derive(Debug, Clone, Default)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        let mut namer = Self::default();
        for name in RESERVED_NAMES {
            namer.taken.insert(name.to_string());
        }
        namer
    }

    /// Claims a name that is already known to be valid
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }

    /// Sanitizes `raw` and makes it unique by adding ` (n)` on collision
    pub fn claim(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.taken.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!(" ({})", n);
            let room = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let stem = truncate_chars(&base, room).trim_end_matches('\'');
            let candidate = format!("{}{}", stem, suffix);
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_characters_replaced() {
        assert_eq!(sanitize_sheet_name("a[b]c:d*e?f/g\\h"), "a b c d e f g h");
    }

    #[test]
    fn test_truncated_to_31_chars() {
        let long = "Asiakaspalvelu ja myynti sekä markkinointi";
        let name = sanitize_sheet_name(long);
        assert_eq!(name.chars().count(), 31);
        assert!(long.starts_with(&name));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let long = "ä".repeat(40);
        assert_eq!(sanitize_sheet_name(&long), "ä".repeat(31));
    }

    #[test]
    fn test_edge_apostrophes_stripped() {
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name("it's"), "it's");
    }

    #[test]
    fn test_blank_names() {
        assert_eq!(sanitize_sheet_name(""), BLANK_SHEET_NAME);
        assert_eq!(sanitize_sheet_name("///"), BLANK_SHEET_NAME);
        assert_eq!(sanitize_sheet_name("''"), BLANK_SHEET_NAME);
    }

    #[test]
    fn test_claim_unique_ignoring_case() {
        let mut namer = SheetNamer::new();
        namer.reserve("index");

        assert_eq!(namer.claim("IT"), "IT");
        assert_eq!(namer.claim("it"), "it (2)");
        assert_eq!(namer.claim("It"), "It (3)");
        assert_eq!(namer.claim("Index"), "Index (2)");
        assert_eq!(namer.claim("HISTORY"), "HISTORY (2)");
    }

    #[test]
    fn test_claim_collapsing_categories() {
        // Both sanitize to "a b"
        let mut namer = SheetNamer::new();
        assert_eq!(namer.claim("a/b"), "a b");
        assert_eq!(namer.claim("a:b"), "a b (2)");
    }

    #[test]
    fn test_claim_suffix_stays_within_limit() {
        let mut namer = SheetNamer::new();
        let long = "x".repeat(40);

        let first = namer.claim(&long);
        let second = namer.claim(&long);

        assert_eq!(first.chars().count(), 31);
        assert_eq!(second.chars().count(), 31);
        assert!(second.ends_with(" (2)"));
    }
}
