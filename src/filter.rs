//! The sanitizing filter: one per document, fed events in order.

use crate::escape::{SafeHtml, escape};
use crate::policy::Policy;
use crate::tokenizer::Event;

/// Per-document sanitizing state machine.
///
/// Feed it every [`Event`] of one document with [`feed`](Self::feed), then
/// call [`render`](Self::render). Rejected constructs are dropped silently;
/// nothing here can fail.
///
/// # Example
///
/// ```
/// use safe_html::{Event, Filter, default_policy};
///
/// let mut filter = Filter::new(default_policy());
/// filter.feed(Event::start("p", [("onclick", "x()")]));
/// filter.feed(Event::text("1 < 2"));
/// filter.feed(Event::end("p"));
/// assert_eq!(filter.render(), "<p>1 &lt; 2</p>");
/// ```
pub struct Filter<'p> {
    policy: &'p Policy,
    open: Vec<String>,
    out: Vec<SafeHtml>,
    skipping: Option<String>,
    events: usize,
}

impl<'p> Filter<'p> {
    /// Create a filter for a single document.
    pub fn new(policy: &'p Policy) -> Self {
        Self {
            policy,
            open: Vec::new(),
            out: Vec::new(),
            skipping: None,
            events: 0,
        }
    }

    /// Process one event.
    pub fn feed(&mut self, event: Event) {
        self.events += 1;

        if let Some(skipped) = &self.skipping {
            if matches!(&event, Event::EndTag(name) if name == skipped) {
                self.skipping = None;
            }
            return;
        }

        match event {
            Event::StartTag {
                name,
                attrs,
                self_closing,
            } => self.start_tag(name, attrs, self_closing),
            Event::EndTag(name) => self.end_tag(&name),
            Event::Text(content) => self.out.push(escape(&content)),
            Event::EntityRef(name) => {
                if !name.is_empty() && name.chars().all(char::is_alphabetic) {
                    self.out.push(SafeHtml::trusted(format!("&{name};")));
                } else {
                    tracing::trace!("Dropped entity reference {name:?}");
                }
            }
            Event::CharRef(code) => {
                if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
                    self.out.push(SafeHtml::trusted(format!("&#{code};")));
                } else {
                    tracing::trace!("Dropped character reference {code:?}");
                }
            }
            Event::Comment(_) | Event::Declaration(_) => {}
        }
    }

    fn start_tag(&mut self, name: String, attrs: Vec<(String, String)>, self_closing: bool) {
        if !self.policy.is_allowed(&name) {
            tracing::trace!("Dropped disallowed tag <{name}>");
            if !self_closing && self.policy.is_raw_text(&name) {
                self.skipping = Some(name);
            }
            return;
        }

        let attrs = self.policy.wash(&name, attrs);
        let attrs = self.policy.apply_handler(&name, attrs);

        let void = self.policy.is_self_closing(&name);
        self.out.push(SafeHtml::start_tag(&name, attrs.iter(), void));
        if !void {
            self.open.push(name);
        }
    }

    fn end_tag(&mut self, name: &str) {
        if self.open.last().is_some_and(|top| top == name) {
            self.open.pop();
            self.out.push(SafeHtml::end_tag(name));
        } else {
            tracing::trace!("Dropped unmatched end tag </{name}>");
        }
    }

    /// Tags opened but not yet closed, innermost last.
    pub fn open_tags(&self) -> &[String] {
        &self.open
    }

    /// Concatenate the output, stripping leading and trailing newlines from
    /// each fragment. Unclosed tags stay unclosed.
    pub fn render(self) -> String {
        let len = self.out.iter().map(|f| f.as_str().len()).sum();
        let mut html = String::with_capacity(len);
        for fragment in &self.out {
            html.push_str(fragment.as_str().trim_matches('\n'));
        }
        tracing::debug!(
            "Sanitized {} events into {} bytes ({} tags left open)",
            self.events,
            html.len(),
            self.open.len()
        );
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::default_policy;

    fn run(events: Vec<Event>) -> String {
        let mut filter = Filter::new(default_policy());
        for event in events {
            filter.feed(event);
        }
        filter.render()
    }

    fn bare(name: &str) -> Event {
        Event::StartTag {
            name: name.to_string(),
            attrs: Vec::new(),
            self_closing: false,
        }
    }

    #[test]
    fn allowed_tag_round_trips() {
        let out = run(vec![bare("p"), Event::text("x"), Event::end("p")]);
        assert_eq!(out, "<p>x</p>");
    }

    #[test]
    fn disallowed_tag_is_flattened() {
        let out = run(vec![
            bare("font"),
            bare("b"),
            Event::text("x"),
            Event::end("b"),
            Event::end("font"),
        ]);
        assert_eq!(out, "<b>x</b>");
    }

    #[test]
    fn disallowed_raw_text_element_drops_content() {
        let out = run(vec![
            bare("script"),
            Event::text("alert(1)"),
            Event::end("script"),
            Event::text("after"),
        ]);
        assert_eq!(out, "after");
    }

    #[test]
    fn self_closing_raw_text_tag_does_not_skip() {
        let out = run(vec![
            Event::StartTag {
                name: "script".into(),
                attrs: vec![],
                self_closing: true,
            },
            Event::text("kept"),
        ]);
        assert_eq!(out, "kept");
    }

    #[test]
    fn mismatched_end_tags_are_dropped() {
        let out = run(vec![
            bare("b"),
            bare("i"),
            Event::text("x"),
            Event::end("b"),
            Event::end("u"),
            Event::end("b"),
        ]);
        // <i> is not whitelisted, so </b> matches the open <b>; the second </b> is stray.
        assert_eq!(out, "<b>x</b>");
    }

    #[test]
    fn end_tag_does_not_close_through_stack() {
        let out = run(vec![bare("div"), bare("span"), Event::end("div"), Event::end("span")]);
        assert_eq!(out, "<div><span></span>");
    }

    #[test]
    fn unclosed_tags_stay_open() {
        let mut filter = Filter::new(default_policy());
        filter.feed(bare("div"));
        filter.feed(bare("p"));
        assert_eq!(filter.open_tags(), ["div".to_string(), "p".to_string()]);
        assert_eq!(filter.render(), "<div><p>");
    }

    #[test]
    fn void_tags_are_self_closed_and_not_pushed() {
        let mut filter = Filter::new(default_policy());
        filter.feed(bare("br"));
        filter.feed(Event::end("br"));
        assert!(filter.open_tags().is_empty());
        assert_eq!(filter.render(), "<br />");
    }

    #[test]
    fn text_is_escaped() {
        let out = run(vec![Event::text("<script>\"'")]);
        assert_eq!(out, "&lt;script&gt;&quot;&#039;");
    }

    #[test]
    fn references_are_validated() {
        let out = run(vec![
            Event::EntityRef("amp".into()),
            Event::EntityRef("a1".into()),
            Event::EntityRef(String::new()),
            Event::CharRef("60".into()),
            Event::CharRef("x3c".into()),
            Event::CharRef(String::new()),
        ]);
        assert_eq!(out, "&amp;&#60;");
    }

    #[test]
    fn comments_and_declarations_are_dropped() {
        let out = run(vec![
            Event::Declaration("DOCTYPE html".into()),
            Event::Comment("<script>".into()),
        ]);
        assert_eq!(out, "");
    }

    #[test]
    fn fragments_lose_surrounding_newlines() {
        let out = run(vec![
            bare("p"),
            Event::text("\nline one\nline two\n"),
            Event::end("p"),
            Event::text("\n\n"),
        ]);
        assert_eq!(out, "<p>line one\nline two</p>");
    }

    #[test]
    fn attributes_are_washed_and_escaped() {
        let out = run(vec![Event::start(
            "span",
            [("class", "a\"b"), ("onmouseover", "x"), ("title", "t")],
        )]);
        assert_eq!(out, r#"<span class="a&quot;b">"#);
    }
}
