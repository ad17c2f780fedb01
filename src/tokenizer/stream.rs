//! Built-in streaming tokenizer.

use super::entities::decode_attr_value;
use super::{Event, EventSource};
use crate::policy::RAW_TEXT_TAGS;

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

fn starts_with_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

/// Single-pass HTML tokenizer.
///
/// Yields [`Event`]s in document order. Tag and attribute names are ASCII
/// lowercased and attribute values are decoded; text is passed through as
/// written, with entity and character references split out as separate
/// events. Constructs left unterminated at the end of the input fall back to
/// text, so every byte of the input ends up in some event or in a dropped
/// comment.
///
/// The scanner only ever stops on ASCII bytes, which can never occur inside
/// a multi-byte UTF-8 sequence, so every slice it takes is on a character
/// boundary.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    raw_text: Option<String>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            raw_text: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Content of a raw-text element, up to `</name` or the end of input.
    fn raw_text(&mut self, name: &str) -> &'a str {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut close = Vec::with_capacity(name.len() + 2);
        close.extend_from_slice(b"</");
        close.extend_from_slice(name.as_bytes());

        let mut end = bytes.len();
        let mut i = 0;
        while let Some(rel) = bytes[i..].iter().position(|&b| b == b'<') {
            i += rel;
            if starts_with_ignore_ascii_case(&bytes[i..], &close) {
                end = i;
                break;
            }
            i += 1;
        }
        self.pos += end;
        &rest[..end]
    }

    /// Text up to the next `<` or `&`, always consuming at least one char.
    fn text(&mut self) -> Event {
        let rest = self.rest();
        let first = rest.chars().next().map_or(0, char::len_utf8);
        let end = rest[first..]
            .find(['<', '&'])
            .map_or(rest.len(), |i| first + i);
        self.pos += end;
        Event::Text(rest[..end].to_string())
    }

    /// Markup starting at `<`. `None` means the `<` is plain text.
    /// `Some(None)` means markup was consumed without producing an event.
    fn markup(&mut self) -> Option<Option<Event>> {
        let rest = self.rest();
        let bytes = rest.as_bytes();

        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body.find("-->")?;
            self.pos += 4 + end + 3;
            return Some(Some(Event::Comment(body[..end].to_string())));
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>')?;
            self.pos += end + 1;
            return Some(Some(Event::Declaration(rest[2..end].to_string())));
        }
        if let Some(body) = rest.strip_prefix("</") {
            return match body.as_bytes().first() {
                Some(b'>') => {
                    self.pos += 3;
                    Some(None)
                }
                Some(b) if b.is_ascii_alphabetic() => {
                    let name_len = body
                        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
                        .unwrap_or(body.len());
                    let end = body[name_len..].find('>')? + name_len;
                    self.pos += 2 + end + 1;
                    Some(Some(Event::EndTag(body[..name_len].to_ascii_lowercase())))
                }
                Some(_) => {
                    let end = body.find('>')?;
                    self.pos += 2 + end + 1;
                    Some(Some(Event::Comment(body[..end].to_string())))
                }
                None => None,
            };
        }
        if bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
            let (event, consumed) = parse_start_tag(rest)?;
            self.pos += consumed;
            if let Event::StartTag {
                name,
                self_closing: false,
                ..
            } = &event
            {
                if RAW_TEXT_TAGS.contains(&name.as_str()) {
                    self.raw_text = Some(name.clone());
                }
            }
            return Some(Some(event));
        }
        None
    }

    /// Reference starting at `&`. `None` means the `&` is plain text.
    fn reference(&mut self) -> Option<Event> {
        let rest = self.rest();
        let bytes = rest.as_bytes();

        let (start, is_char_ref) = if bytes.get(1) == Some(&b'#') {
            (2, true)
        } else if bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
            (1, false)
        } else {
            return None;
        };

        let mut end = start;
        while end < bytes.len()
            && (bytes[end].is_ascii_alphanumeric()
                || (!is_char_ref && matches!(bytes[end], b'-' | b'.')))
        {
            end += 1;
        }
        // Empty or unterminated references are text.
        if end == start || end == bytes.len() {
            return None;
        }

        let body = rest[start..end].to_string();
        self.pos += end + usize::from(bytes[end] == b';');
        Some(if is_char_ref {
            Event::CharRef(body)
        } else {
            Event::EntityRef(body)
        })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        while self.pos < self.input.len() {
            if let Some(name) = self.raw_text.take() {
                let content = self.raw_text(&name);
                if !content.is_empty() {
                    return Some(Event::Text(content.to_string()));
                }
                continue;
            }

            let event = match self.rest().as_bytes()[0] {
                b'<' => match self.markup() {
                    Some(Some(event)) => event,
                    Some(None) => continue,
                    None => self.text(),
                },
                b'&' => match self.reference() {
                    Some(event) => event,
                    None => self.text(),
                },
                _ => self.text(),
            };
            return Some(event);
        }
        None
    }
}

/// Parse `<name attr=value ...>` at the start of `s`, returning the event
/// and the number of bytes consumed. `None` if the tag is never closed.
fn parse_start_tag(s: &str) -> Option<(Event, usize)> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut i = 1;
    while i < len && !is_space(bytes[i]) && bytes[i] != b'/' && bytes[i] != b'>' {
        i += 1;
    }
    let name = s[1..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while i < len && is_space(bytes[i]) {
            i += 1;
        }
        if i >= len {
            return None;
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                i += 1;
                if bytes.get(i) == Some(&b'>') {
                    self_closing = true;
                    i += 1;
                    break;
                }
            }
            _ => {
                let start = i;
                i += 1;
                while i < len
                    && !is_space(bytes[i])
                    && !matches!(bytes[i], b'/' | b'>' | b'=')
                {
                    i += 1;
                }
                let key = s[start..i].to_ascii_lowercase();

                while i < len && is_space(bytes[i]) {
                    i += 1;
                }
                let mut value = String::new();
                if bytes.get(i) == Some(&b'=') {
                    i += 1;
                    while i < len && is_space(bytes[i]) {
                        i += 1;
                    }
                    let quote = *bytes.get(i)?;
                    let raw = if quote == b'"' || quote == b'\'' {
                        let close = s[i + 1..].find(char::from(quote))? + i + 1;
                        let raw = &s[i + 1..close];
                        i = close + 1;
                        raw
                    } else {
                        let start = i;
                        while i < len && !is_space(bytes[i]) && bytes[i] != b'>' {
                            i += 1;
                        }
                        &s[start..i]
                    };
                    value = decode_attr_value(raw);
                }
                attrs.push((key, value));
            }
        }
    }

    Some((
        Event::StartTag {
            name,
            attrs,
            self_closing,
        },
        i,
    ))
}

/// [`EventSource`] backed by the built-in [`Tokenizer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamingSource;

impl EventSource for StreamingSource {
    fn events(&self, html: &str) -> Vec<Event> {
        Tokenizer::new(html).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(html: &str) -> Vec<Event> {
        Tokenizer::new(html).collect()
    }

    fn start(name: &str, attrs: &[(&str, &str)]) -> Event {
        Event::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            self_closing: false,
        }
    }

    #[test]
    fn simple_element() {
        assert_eq!(
            tokenize("<p class=\"x\">hi</p>"),
            vec![
                start("p", &[("class", "x")]),
                Event::text("hi"),
                Event::end("p"),
            ]
        );
    }

    #[test]
    fn names_are_lowercased() {
        assert_eq!(
            tokenize("<DIV ID='a'></Div>"),
            vec![start("div", &[("id", "a")]), Event::end("div")]
        );
    }

    #[test]
    fn unquoted_and_valueless_attributes() {
        assert_eq!(
            tokenize("<img src=1 onerror=alert(1) hidden>"),
            vec![start(
                "img",
                &[("src", "1"), ("onerror", "alert(1)"), ("hidden", "")]
            )]
        );
    }

    #[test]
    fn self_closing_tag() {
        assert_eq!(
            tokenize("<br/><img src='a' />"),
            vec![
                Event::StartTag {
                    name: "br".into(),
                    attrs: vec![],
                    self_closing: true,
                },
                Event::StartTag {
                    name: "img".into(),
                    attrs: vec![("src".into(), "a".into())],
                    self_closing: true,
                },
            ]
        );
    }

    #[test]
    fn attribute_values_are_decoded() {
        assert_eq!(
            tokenize("<a href=\"&#x6A;avascript:x\" title='a&lt;b'>"),
            vec![start("a", &[("href", "javascript:x"), ("title", "a<b")])]
        );
    }

    #[test]
    fn quoted_value_may_contain_markup_chars() {
        assert_eq!(
            tokenize("<a title=\"x > y\">"),
            vec![start("a", &[("title", "x > y")])]
        );
    }

    #[test]
    fn references_in_text() {
        assert_eq!(
            tokenize("a &gt; b &#60; c &#x3c; d"),
            vec![
                Event::text("a "),
                Event::EntityRef("gt".into()),
                Event::text(" b "),
                Event::CharRef("60".into()),
                Event::text(" c "),
                Event::CharRef("x3c".into()),
                Event::text(" d"),
            ]
        );
    }

    #[test]
    fn bare_and_unterminated_ampersands_are_text() {
        assert_eq!(
            tokenize("fish & chips &"),
            vec![Event::text("fish "), Event::text("& chips "), Event::text("&")]
        );
        assert_eq!(tokenize("&amp"), vec![Event::text("&amp")]);
        assert_eq!(tokenize("&#;"), vec![Event::text("&#;")]);
    }

    #[test]
    fn script_content_is_raw_text() {
        assert_eq!(
            tokenize("<script>if (a < b) { x = '</p>'; }</SCRIPT>after"),
            vec![
                start("script", &[]),
                Event::text("if (a < b) { x = '</p>'; }"),
                Event::end("script"),
                Event::text("after"),
            ]
        );
    }

    #[test]
    fn policy_raw_text_tags_are_tokenized_as_raw_text() {
        for &tag in RAW_TEXT_TAGS {
            let html = format!("<{tag}><p>x</p></{tag}>");
            assert_eq!(
                tokenize(&html),
                vec![start(tag, &[]), Event::text("<p>x</p>"), Event::end(tag)],
                "{tag} content was tokenized as markup"
            );
        }
    }

    #[test]
    fn unclosed_script_runs_to_end() {
        assert_eq!(
            tokenize("<style>a{}<b>"),
            vec![start("style", &[]), Event::text("a{}<b>")]
        );
    }

    #[test]
    fn comments_and_declarations() {
        assert_eq!(
            tokenize("<!DOCTYPE html><!-- note --><?xml x?>t"),
            vec![
                Event::Declaration("DOCTYPE html".into()),
                Event::Comment(" note ".into()),
                Event::Declaration("xml x?".into()),
                Event::text("t"),
            ]
        );
    }

    #[test]
    fn stray_angle_brackets_are_text() {
        assert_eq!(
            tokenize("1 < 2 <> 3"),
            vec![Event::text("1 "), Event::text("< 2 "), Event::text("<> 3")]
        );
    }

    #[test]
    fn empty_and_bogus_end_tags() {
        assert_eq!(
            tokenize("a</>b</ x>c"),
            vec![
                Event::text("a"),
                Event::text("b"),
                Event::Comment(" x".into()),
                Event::text("c"),
            ]
        );
    }

    #[test]
    fn unterminated_tag_falls_back_to_text() {
        assert_eq!(
            tokenize("<img src=x onerror=alert(1)"),
            vec![Event::text("<img src=x onerror=alert(1)")]
        );
        assert_eq!(
            tokenize("<a title=\"open"),
            vec![Event::text("<a title=\"open")]
        );
    }

    #[test]
    fn multibyte_text_and_attributes() {
        assert_eq!(
            tokenize("<p é=\"ü\">日本<br></p>"),
            vec![
                start("p", &[("é", "ü")]),
                Event::text("日本"),
                start("br", &[]),
                Event::end("p"),
            ]
        );
    }

    #[test]
    fn streaming_source_collects_all_events() {
        let events = StreamingSource.events("<b>x</b>");
        assert_eq!(events.len(), 3);
    }
}
