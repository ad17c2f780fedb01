//! Per-tag handlers and the attribute value constraints they enforce.
//!
//! A handler runs after washing and before emission. Handlers are built from
//! the same few primitives ([`neutralize_style`], [`normalize_url`],
//! [`limit_values`]) so a new tag's policy is one more function in the table.

use super::attrs::Attributes;
use super::style::neutralize_style;
use super::url::normalize_url;

/// A per-tag policy step over already-washed attributes.
pub type TagHandler = fn(Attributes) -> Attributes;

/// Enumerated values permitted for an attribute.
pub type ValueConstraints = &'static [(&'static str, &'static [&'static str])];

const TRUE_FALSE: &[&str] = &["true", "false"];

/// Value constraints enforced on `<a>`.
pub const ANCHOR_LIMITS: ValueConstraints = &[("target", &["_blank", "_self"])];

/// Value constraints enforced on `<embed>`.
pub const EMBED_LIMITS: ValueConstraints = &[
    ("type", &["application/x-shockwave-flash"]),
    ("wmode", &["transparent", "window", "opaque"]),
    ("play", TRUE_FALSE),
    ("loop", TRUE_FALSE),
    ("menu", TRUE_FALSE),
    ("allowfullscreen", TRUE_FALSE),
];

/// Handler for every whitelisted tag without its own entry.
pub fn default_handler(mut attrs: Attributes) -> Attributes {
    attrs.update("style", neutralize_style);
    attrs
}

/// `<img>`: default processing, then scheme-force `src`.
pub fn image_handler(attrs: Attributes) -> Attributes {
    let mut attrs = default_handler(attrs);
    attrs.update("src", normalize_url);
    attrs
}

/// `<a>`: scheme-force `href`, default `target` to `_blank`, then enforce
/// the target constraint.
///
/// The constraint runs after the default, so an explicit invalid target is
/// dropped and not replaced.
pub fn anchor_handler(attrs: Attributes) -> Attributes {
    let mut attrs = default_handler(attrs);
    attrs.update("href", normalize_url);
    if !attrs.contains("target") {
        attrs.set("target", "_blank");
    }
    limit_values(attrs, ANCHOR_LIMITS)
}

/// `<embed>`: scheme-force `src`, enforce the embed constraints and lock
/// down script access and networking.
pub fn embed_handler(attrs: Attributes) -> Attributes {
    let mut attrs = default_handler(attrs);
    attrs.update("src", normalize_url);
    let mut attrs = limit_values(attrs, EMBED_LIMITS);
    attrs.set("allowscriptaccess", "never");
    attrs.set("allownetworking", "none");
    attrs
}

/// Drop every constrained attribute whose value is not one of its
/// permitted literals.
pub fn limit_values(mut attrs: Attributes, limits: ValueConstraints) -> Attributes {
    for (key, allowed) in limits {
        if attrs.get(key).is_some_and(|v| !allowed.contains(&v)) {
            tracing::trace!("Dropped {key} attribute with disallowed value");
            attrs.remove(key);
        }
    }
    attrs
}
