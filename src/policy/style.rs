//! Pattern-based neutralization of inline `style` values.

use std::sync::LazyLock;

use regex::Regex;

/// Character that replaces every neutralized construct.
pub const PLACEHOLDER: &str = "_";

static ESCAPES_AND_COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\|&#|/\*|\*/").expect("style escape pattern is valid"));

static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)e.*x.*p.*r.*e.*s.*s.*i.*o.*n").expect("expression pattern is valid")
});

/// Neutralize a CSS declaration list.
///
/// Backslash escapes, numeric character references and comment delimiters
/// are replaced first, so a payload split by `/**/` is rejoined before the
/// `expression` pattern runs. The pattern accepts any characters between
/// the letters, including newlines.
pub fn neutralize_style(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let value = ESCAPES_AND_COMMENTS.replace_all(value, PLACEHOLDER);
    EXPRESSION.replace_all(&value, PLACEHOLDER).into_owned()
}
