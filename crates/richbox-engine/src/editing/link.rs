use std::sync::OnceLock;

use regex::Regex;

/// Normalize a URL typed by the user.
///
/// Returns `None` for blank input. A URL that already names a scheme
/// (`https://`, `ftp://`, `mailto:`, `tel:`) is kept as typed; anything else
/// gets `default_scheme` in front.
pub fn normalize_url(input: &str, default_scheme: &str) -> Option<String> {
    static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
    let scheme_regex = SCHEME_REGEX.get_or_init(|| {
        Regex::new(r"^(?i)(?:[a-z][a-z0-9+.\-]*://|mailto:|tel:)").expect("Invalid scheme regex")
    });

    let url = input.trim();
    if url.is_empty() {
        return None;
    }
    if scheme_regex.is_match(url) {
        Some(url.to_string())
    } else {
        Some(format!("{default_scheme}{url}"))
    }
}
