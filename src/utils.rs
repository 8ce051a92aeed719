//! Small helpers shared by the scrapers.
//!
//! - DOM text extraction with the same trimming rules everywhere
//! - Relative link resolution against the site origin
//! - String truncation for log fields

use scraper::ElementRef;
use url::Url;

/// Concatenated, trimmed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolve `href` against `base`, returning `None` for empty or unparsable links.
pub fn absolute_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut after `max` characters (not bytes, the site is
/// mostly Japanese) with an ellipsis and a count of the dropped characters.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("あいうえお", 2), "あい…(+3 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let dropped = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], dropped)
        }
    }
}
