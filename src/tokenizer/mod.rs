//! Parse events and the sources that produce them.
//!
//! The filter only sees [`Event`]s; where they come from is up to the
//! [`EventSource`]. Two sources ship with the crate:
//!
//! - [`StreamingSource`] -- the built-in [`Tokenizer`], a single forward pass
//!   over the input that reports entity and character references as their
//!   own events.
//! - [`ScraperSource`] -- parses with `scraper` (html5ever) and walks the
//!   resulting tree (requires the `scraper` feature).

mod entities;
mod stream;
#[cfg(feature = "scraper")]
mod tree;

pub use entities::decode_attr_value;
pub use stream::{StreamingSource, Tokenizer};
#[cfg(feature = "scraper")]
pub use tree::ScraperSource;

/// One parse event, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// `<name key="value" ...>`, or `<name ... />` when `self_closing` is set.
    /// Attribute values are already decoded.
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    /// `</name>`.
    EndTag(String),
    /// Character data, undecoded apart from what the source itself resolves.
    Text(String),
    /// `&name;`, carrying `name`.
    EntityRef(String),
    /// `&#digits;`, carrying whatever followed `&#` (`"65"`, `"x41"`, ...).
    CharRef(String),
    /// `<!-- ... -->`.
    Comment(String),
    /// `<!DOCTYPE ...>`, `<![CDATA[ ... ]]>`, `<? ... >` and similar.
    Declaration(String),
}

impl Event {
    /// Shorthand for a start tag event.
    pub fn start<N, K, V>(name: N, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        N: Into<String>,
        K: Into<String>,
        V: Into<String>,
    {
        Event::StartTag {
            name: name.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            self_closing: false,
        }
    }

    /// Shorthand for a text event.
    pub fn text(content: impl Into<String>) -> Self {
        Event::Text(content.into())
    }

    /// Shorthand for an end tag event.
    pub fn end(name: impl Into<String>) -> Self {
        Event::EndTag(name.into())
    }
}

/// Anything that can turn HTML text into a sequence of [`Event`]s.
///
/// Implementations must accept any input, however malformed, and must
/// never fail.
pub trait EventSource: Send + Sync {
    /// Tokenize `html` into events in document order.
    fn events(&self, html: &str) -> Vec<Event>;
}
