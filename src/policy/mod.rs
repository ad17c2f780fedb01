//! Whitelist policy tables.
//!
//! A [`Policy`] is built once and then only read: every [`Filter`](crate::Filter)
//! borrows it, so any number of documents can be sanitized against the same
//! policy at the same time.
//!
//! Building blocks:
//!
//! - [`Attributes`] -- ordered attribute list passed through washing and handlers.
//! - [`normalize_url`] -- scheme forcing for `href`/`src`.
//! - [`neutralize_style`] -- pattern-based neutralization of inline CSS.
//! - [`TagHandler`] -- per-tag policy step, see [`handlers`].

mod attrs;
pub mod handlers;
mod style;
mod url;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

pub use attrs::Attributes;
pub use handlers::TagHandler;
pub use style::neutralize_style;
pub use url::normalize_url;

/// Tags allowed by the default policy.
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "a", "img", "br", "strong", "b", "code", "pre", "p", "div", "em", "span", "h1", "h2", "h3",
    "h4", "h5", "h6", "blockquote", "ul", "ol", "tr", "th", "td", "hr", "li", "u", "embed", "s",
    "table", "thead", "tbody", "caption", "small", "q", "sup", "sub",
];

/// Tags emitted in self-closed form and never pushed on the open-tag stack.
pub const SELF_CLOSING_TAGS: &[&str] = &["img", "hr", "br", "embed"];

/// Attributes allowed on every whitelisted tag.
pub const COMMON_ATTRS: &[&str] = &["id", "style", "class", "name"];

/// Additional attributes allowed on specific tags.
pub const TAG_ATTRS: &[(&str, &[&str])] = &[
    ("img", &["src", "width", "height", "alt", "align"]),
    ("a", &["href", "target", "rel", "title"]),
    (
        "embed",
        &[
            "src",
            "width",
            "height",
            "type",
            "allowfullscreen",
            "loop",
            "play",
            "wmode",
            "menu",
        ],
    ),
    ("table", &["border", "cellpadding", "cellspacing"]),
];

/// Elements whose content is raw text rather than markup. When one of these
/// is not whitelisted, its content is dropped along with its tags.
pub const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Immutable sanitization policy.
#[derive(Clone, Debug)]
pub struct Policy {
    allowed_tags: HashSet<String>,
    handlers: HashMap<String, TagHandler>,
}

impl Policy {
    /// Create a policy with the given whitelist and the built-in handlers.
    pub(crate) fn new(allowed_tags: HashSet<String>, handlers: HashMap<String, TagHandler>) -> Self {
        Self {
            allowed_tags,
            handlers,
        }
    }

    /// The handlers every policy starts with.
    pub(crate) fn builtin_handlers() -> HashMap<String, TagHandler> {
        let mut handlers: HashMap<String, TagHandler> = HashMap::new();
        handlers.insert("img".to_string(), handlers::image_handler);
        handlers.insert("a".to_string(), handlers::anchor_handler);
        handlers.insert("embed".to_string(), handlers::embed_handler);
        handlers
    }

    /// Returns `true` if `tag` may appear in output.
    pub fn is_allowed(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    /// Returns `true` if `tag` is emitted as `<tag ... />`.
    pub fn is_self_closing(&self, tag: &str) -> bool {
        SELF_CLOSING_TAGS.contains(&tag)
    }

    /// Returns `true` if `tag` holds raw text (script or style).
    pub fn is_raw_text(&self, tag: &str) -> bool {
        RAW_TEXT_TAGS.contains(&tag)
    }

    /// The whitelist, in no particular order.
    pub fn allowed_tags(&self) -> impl Iterator<Item = &str> {
        self.allowed_tags.iter().map(String::as_str)
    }

    /// Returns `true` if `attr` may appear on `tag`.
    pub fn is_allowed_attr(&self, tag: &str, attr: &str) -> bool {
        COMMON_ATTRS.contains(&attr) || tag_attrs(tag).contains(&attr)
    }

    /// Keep only the attributes allowed on `tag`, in document order.
    ///
    /// Filtering happens before the survivors are collected, so the cost of
    /// de-duplication is bounded by the size of the allowed set rather than
    /// by the number of attributes the input carries.
    pub fn wash(&self, tag: &str, attrs: Vec<(String, String)>) -> Attributes {
        let total = attrs.len();
        let washed: Attributes = attrs
            .into_iter()
            .filter(|(key, _)| self.is_allowed_attr(tag, key))
            .collect();
        if washed.len() < total {
            tracing::trace!("Dropped {} attributes on <{tag}>", total - washed.len());
        }
        washed
    }

    /// Run the handler registered for `tag`, or the default handler.
    pub fn apply_handler(&self, tag: &str, attrs: Attributes) -> Attributes {
        let handler = self
            .handlers
            .get(tag)
            .copied()
            .unwrap_or(handlers::default_handler as TagHandler);
        handler(attrs)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(
            DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            Self::builtin_handlers(),
        )
    }
}

fn tag_attrs(tag: &str) -> &'static [&'static str] {
    TAG_ATTRS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, attrs)| *attrs)
        .unwrap_or(&[])
}

static DEFAULT_POLICY: OnceLock<Policy> = OnceLock::new();

/// The process-wide default policy, built on first use and never mutated.
pub fn default_policy() -> &'static Policy {
    DEFAULT_POLICY.get_or_init(Policy::default)
}
