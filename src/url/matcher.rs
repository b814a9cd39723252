/// Checks if an attribute value carries every token of a pattern
///
/// Both sides are whitespace-separated token lists, the way `class` and
/// `rel` attributes are written. Token order and extra tokens on the
/// candidate are irrelevant; comparison is ASCII case-insensitive.
///
/// # Arguments
///
/// * `pattern` - The tokens that must all be present, e.g. `"job-box__hover gtm-search-result"`
/// * `candidate` - The attribute value found in the markup
///
/// # Returns
///
/// * `true` - If every pattern token appears in the candidate
/// * `false` - Otherwise, or if the pattern has no tokens
///
/// # Examples
///
/// ```
/// use jobsift::url::contains_tokens;
///
/// assert!(contains_tokens("job-box__title", "job-box__title"));
/// assert!(contains_tokens("job-box__hover gtm-search-result", "gtm-search-result job-box__hover extra"));
/// assert!(contains_tokens("next", "NEXT"));
/// assert!(!contains_tokens("job-box__hover gtm-search-result", "job-box__hover"));
/// assert!(!contains_tokens("job-box", "job-box__title"));
/// ```
pub fn contains_tokens(pattern: &str, candidate: &str) -> bool {
    let mut required = pattern.split_whitespace().peekable();
    if required.peek().is_none() {
        return false;
    }

    required.all(|token| {
        candidate
            .split_whitespace()
            .any(|present| present.eq_ignore_ascii_case(token))
    })
}
