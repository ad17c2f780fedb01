//! # safe_html
//!
//! A whitelist-based HTML sanitizer for user-supplied rich text.
//!
//! ## Overview
//!
//! `safe_html` turns untrusted HTML into a string that is safe to embed in a
//! page. Tags outside the whitelist are removed (their text is kept),
//! attributes outside the per-tag sets are removed, `href`/`src` values are
//! forced onto `http`, `https` or `ftp`, inline styles are stripped of
//! `expression()` and escape tricks, and every piece of text and every
//! attribute value is escaped on the way out.
//!
//! Sanitizing never fails: anything the policy rejects is dropped and the
//! rest of the document carries on.
//!
//! ## Quick start
//!
//! ```
//! let html = safe_html::clean(r#"<p onclick="x()"><a href='javascript:alert(1)'>hi</a></p>"#);
//! assert_eq!(html, r#"<p><a href="http://javascript:alert(1)" target="_blank">hi</a></p>"#);
//! ```
//!
//! For a custom whitelist, use [`SanitizerBuilder`]:
//!
//! ```
//! use safe_html::{Sanitizer, SanitizerBuilder};
//!
//! let sanitizer = SanitizerBuilder::new()
//!     .allowed_tags(["b", "i", "br"])
//!     .build()
//!     .unwrap();
//! assert_eq!(sanitizer.sanitize("<b>bold</b><p>para</p>"), "<b>bold</b>para");
//! ```
//!
//! ## Pipeline
//!
//! An [`EventSource`] tokenizes the input into [`Event`]s; a per-document
//! [`Filter`] checks each event against a shared, immutable [`Policy`] and
//! collects [`SafeHtml`] fragments; [`Filter::render`] joins them.
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `scraper` | **yes** | Enables [`ScraperSource`], an event source backed by `scraper`/html5ever. |

pub mod config;
pub mod error;
pub mod escape;
pub mod filter;
pub mod policy;
pub mod sanitizer;
pub mod tokenizer;

pub use config::SanitizerBuilder;
pub use error::{Result, SafeHtmlError};
pub use escape::{SafeHtml, escape};
pub use filter::Filter;
pub use policy::{Attributes, Policy, TagHandler, default_policy};
pub use sanitizer::{HtmlSanitizer, Sanitizer};
#[cfg(feature = "scraper")]
pub use tokenizer::ScraperSource;
pub use tokenizer::{Event, EventSource, StreamingSource, Tokenizer};

use std::sync::OnceLock;

// Process-wide sanitizer behind `clean`
static DEFAULT: OnceLock<HtmlSanitizer> = OnceLock::new();

/// The process-wide sanitizer with the default policy and the built-in
/// tokenizer, created on first use.
pub fn default_sanitizer() -> &'static HtmlSanitizer {
    DEFAULT.get_or_init(|| {
        SanitizerBuilder::new()
            .build()
            .unwrap_or_else(|e| panic!("default sanitizer policy is invalid: {e}"))
    })
}

/// Sanitize `html` with the default policy.
///
/// # Example
///
/// ```
/// assert_eq!(safe_html::clean("<script>alert(1)</script>"), "");
/// assert_eq!(safe_html::clean("<img src=1 onerror=alert(1)>"), r#"<img src="http://1" />"#);
/// ```
pub fn clean(html: &str) -> String {
    default_sanitizer().sanitize(html)
}
