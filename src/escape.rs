//! Output escaping and the [`SafeHtml`] fragment type.

use std::fmt;

/// A fragment of markup that is safe to place in the output document.
///
/// Values of this type are produced either by [`escape`] or by the filter's
/// own markup constructors, which only ever combine whitelisted names with
/// escaped values. Raw input strings cannot be turned into `SafeHtml`
/// without going through one of those paths, so nothing is escaped twice
/// and nothing reaches the output unescaped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Wrap markup the crate itself generated from trusted parts.
    pub(crate) fn trusted(markup: String) -> Self {
        Self(markup)
    }

    /// Borrow the fragment as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the fragment and return the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Build `<name key="value" ...>` or `<name ... />`.
    ///
    /// `name` and the attribute keys come from the policy tables; every
    /// value goes through [`escape_attr`] here.
    pub(crate) fn start_tag<'a>(
        name: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
        self_closing: bool,
    ) -> Self {
        let mut out = String::with_capacity(name.len() + 2);
        out.push('<');
        out.push_str(name);
        for (key, value) in attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if self_closing {
            out.push_str(" /");
        }
        out.push('>');
        Self(out)
    }

    /// Build `</name>`.
    pub(crate) fn end_tag(name: &str) -> Self {
        Self(format!("</{name}>"))
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Escape `<`, `>`, `"` and `'` so `text` can sit in element content or in
/// a double-quoted attribute value.
///
/// `&` is left alone: character references in the input are re-emitted by
/// the filter as references, and a bare ampersand cannot open a tag or close
/// an attribute.
pub fn escape(text: &str) -> SafeHtml {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    SafeHtml(out)
}

/// Escape an attribute value: everything [`escape`] does, plus `&`.
///
/// Attribute values arrive with their character references decoded, so a
/// literal `&` must be re-encoded or a later parse would decode it again.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_replaces_markup_characters() {
        assert_eq!(
            escape(r#"<b class="x">it's</b>"#).as_str(),
            "&lt;b class=&quot;x&quot;&gt;it&#039;s&lt;/b&gt;"
        );
    }

    #[test]
    fn escape_leaves_ampersand_and_plain_text() {
        assert_eq!(escape("fish & chips").as_str(), "fish & chips");
        assert_eq!(escape("").as_str(), "");
    }

    #[test]
    fn start_tag_escapes_values() {
        let tag = SafeHtml::start_tag("a", [("title", "\"><script>")], false);
        assert_eq!(tag.as_str(), r#"<a title="&quot;&gt;&lt;script&gt;">"#);
    }

    #[test]
    fn start_tag_encodes_ampersands_in_values() {
        let tag = SafeHtml::start_tag("a", [("href", "http://x/?a=1&b=2"), ("title", "&amp;")], false);
        assert_eq!(
            tag.as_str(),
            r#"<a href="http://x/?a=1&amp;b=2" title="&amp;amp;">"#
        );
    }

    #[test]
    fn start_tag_self_closing() {
        let tag = SafeHtml::start_tag("br", std::iter::empty(), true);
        assert_eq!(tag.as_str(), "<br />");
        let tag = SafeHtml::start_tag("img", [("src", "http://x")], true);
        assert_eq!(tag.as_str(), r#"<img src="http://x" />"#);
    }

    #[test]
    fn end_tag_and_display() {
        let tag = SafeHtml::end_tag("p");
        assert_eq!(tag.to_string(), "</p>");
        assert!(!tag.is_empty());
        assert!(SafeHtml::default().is_empty());
    }
}
