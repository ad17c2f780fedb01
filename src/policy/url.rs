//! Scheme forcing for URL-bearing attributes.

use std::sync::LazyLock;

use regex::Regex;

static ALLOWED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?:http|https|ftp)://.+").expect("allowed-url pattern is valid")
});

/// Return `value` unchanged if it is an absolute `http`, `https` or `ftp` URL,
/// otherwise prefix it with `http://`.
///
/// Any other scheme (`javascript:`, `data:`, `vbscript:` ...) ends up inside
/// the host part of an `http` URL, where it cannot execute. This is a textual
/// check only; the URL is not parsed.
pub fn normalize_url(value: &str) -> String {
    if ALLOWED_URL.is_match(value) {
        value.to_string()
    } else {
        format!("http://{value}")
    }
}
