//! Event source backed by `scraper`'s HTML5 tree builder.

use ego_tree::iter::Edge;
use scraper::{Html, node::Node};

use super::{Event, EventSource};

/// HTML5 void elements, which never get an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// [`EventSource`] that parses the input as an HTML5 fragment and replays
/// the resulting tree as events.
///
/// The tree builder resolves character references and repairs nesting
/// before the filter sees anything, so this source never produces
/// [`Event::EntityRef`] or [`Event::CharRef`]. Decoded text still goes
/// through the filter's escaper.
///
/// # Example
///
/// ```
/// use safe_html::{SanitizerBuilder, ScraperSource, Sanitizer};
///
/// let sanitizer = SanitizerBuilder::new()
///     .event_source(ScraperSource)
///     .build()
///     .unwrap();
/// assert_eq!(sanitizer.sanitize("<p>a<b>b</p>"), "<p>a<b>b</b></p>");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ScraperSource;

impl EventSource for ScraperSource {
    fn events(&self, html: &str) -> Vec<Event> {
        let document = Html::parse_fragment(html);
        let mut events = Vec::new();

        for edge in document.tree.root().traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Node::Element(el) => events.push(Event::StartTag {
                        name: el.name().to_string(),
                        attrs: el
                            .attrs()
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .collect(),
                        self_closing: false,
                    }),
                    Node::Text(text) => events.push(Event::Text(String::from(&**text))),
                    Node::Comment(comment) => {
                        events.push(Event::Comment(String::from(&**comment)));
                    }
                    Node::Doctype(doctype) => {
                        events.push(Event::Declaration(format!("DOCTYPE {}", doctype.name())));
                    }
                    _ => {}
                },
                Edge::Close(node) => {
                    if let Node::Element(el) = node.value() {
                        if !VOID_ELEMENTS.contains(&el.name()) {
                            events.push(Event::EndTag(el.name().to_string()));
                        }
                    }
                }
            }
        }

        tracing::trace!("Tree walk produced {} events", events.len());
        events
    }
}
