use url::Url;

/// Resolves a link found in markup against the site origin
///
/// Relative paths are joined onto `origin`; absolute links are kept as they
/// are. If the join fails the origin is prefixed verbatim, so the result is
/// never a bare relative path.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use jobsift::url::absolutize;
///
/// let origin = Url::parse("https://duunitori.fi").unwrap();
/// assert_eq!(absolutize(&origin, "/tyopaikat/tyo/123"), "https://duunitori.fi/tyopaikat/tyo/123");
/// assert_eq!(absolutize(&origin, "https://other.fi/x"), "https://other.fi/x");
/// ```
pub fn absolutize(origin: &Url, href: &str) -> String {
    let href = href.trim();

    match origin.join(href) {
        Ok(absolute) => absolute.to_string(),
        Err(e) => {
            tracing::debug!("Could not join {} onto {}: {}", href, origin, e);
            let base = origin.as_str().trim_end_matches('/');
            if href.starts_with('/') {
                format!("{}{}", base, href)
            } else {
                format!("{}/{}", base, href)
            }
        }
    }
}

/// Derives a slug from the last non-empty path segment of a URL
///
/// Used for listings whose markup carries no slug attribute.
///
/// # Examples
///
/// ```
/// use jobsift::url::slug_from_url;
///
/// assert_eq!(
///     slug_from_url("https://duunitori.fi/tyopaikat/tyo/data-analyst-123/"),
///     Some("data-analyst-123".to_string())
/// );
/// assert_eq!(slug_from_url("https://duunitori.fi/"), None);
/// ```
pub fn slug_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://duunitori.fi").unwrap()
    }

    #[test]
    fn test_absolutize_root_relative() {
        assert_eq!(
            absolutize(&origin(), "/job/123"),
            "https://duunitori.fi/job/123"
        );
    }

    #[test]
    fn test_absolutize_keeps_query() {
        assert_eq!(
            absolutize(&origin(), "/tyopaikat?sivu=2&order_by=date_posted"),
            "https://duunitori.fi/tyopaikat?sivu=2&order_by=date_posted"
        );
    }

    #[test]
    fn test_absolutize_absolute_link_unchanged() {
        assert_eq!(
            absolutize(&origin(), "https://example.com/job/1"),
            "https://example.com/job/1"
        );
    }

    #[test]
    fn test_absolutize_trims_whitespace() {
        assert_eq!(
            absolutize(&origin(), "  /job/9 \n"),
            "https://duunitori.fi/job/9"
        );
    }

    #[test]
    fn test_slug_from_url() {
        assert_eq!(
            slug_from_url("https://duunitori.fi/tyopaikat/tyo/analyst-42"),
            Some("analyst-42".to_string())
        );
        assert_eq!(slug_from_url("https://duunitori.fi"), None);
        assert_eq!(slug_from_url("not a url"), None);
    }
}
