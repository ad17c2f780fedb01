//! Builder for configuring an [`HtmlSanitizer`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{Result, SafeHtmlError};
use crate::policy::{DEFAULT_ALLOWED_TAGS, Policy, TagHandler};
use crate::sanitizer::HtmlSanitizer;
use crate::tokenizer::{EventSource, StreamingSource};

/// Builder for configuring and creating an [`HtmlSanitizer`].
///
/// Starts from the default policy and the built-in streaming tokenizer.
/// Attribute sets and value constraints are fixed; the tag whitelist, the
/// per-tag handlers and the event source can be changed.
///
/// # Example
///
/// ```
/// use safe_html::{Sanitizer, SanitizerBuilder};
///
/// let sanitizer = SanitizerBuilder::new()
///     .allowed_tags(["p", "b", "a"])
///     .build()
///     .unwrap();
/// assert_eq!(
///     sanitizer.sanitize("<p><i>x</i><a href=/y>y</a></p>"),
///     r#"<p>x<a href="http:///y" target="_blank">y</a></p>"#,
/// );
/// ```
pub struct SanitizerBuilder<S: EventSource = StreamingSource> {
    allowed_tags: HashSet<String>,
    handlers: HashMap<String, TagHandler>,
    custom: HashSet<String>,
    source: S,
}

impl SanitizerBuilder {
    /// Create a builder with the default whitelist and handlers.
    pub fn new() -> Self {
        Self {
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            handlers: Policy::builtin_handlers(),
            custom: HashSet::new(),
            source: StreamingSource,
        }
    }
}

impl Default for SanitizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSource> SanitizerBuilder<S> {
    /// Replace the tag whitelist.
    pub fn allowed_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.allowed_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Add one tag to the whitelist.
    pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
        self.allowed_tags.insert(tag.into());
        self
    }

    /// Remove one tag from the whitelist.
    pub fn remove_tag(mut self, tag: &str) -> Self {
        self.allowed_tags.remove(tag);
        self
    }

    /// Register or replace the handler run for `tag` after washing.
    ///
    /// The tag must also be whitelisted by the time [`build`](Self::build)
    /// is called.
    pub fn tag_handler(mut self, tag: impl Into<String>, handler: TagHandler) -> Self {
        let tag = tag.into();
        self.custom.insert(tag.clone());
        self.handlers.insert(tag, handler);
        self
    }

    /// Use a different [`EventSource`].
    pub fn event_source<T: EventSource>(self, source: T) -> SanitizerBuilder<T> {
        SanitizerBuilder {
            allowed_tags: self.allowed_tags,
            handlers: self.handlers,
            custom: self.custom,
            source,
        }
    }

    /// Validate the configuration and create the sanitizer.
    ///
    /// Fails with [`SafeHtmlError::InvalidTagName`] if a whitelisted tag is
    /// not a plain lowercase name, and with [`SafeHtmlError::Config`] if a
    /// custom handler was registered for a tag outside the whitelist.
    pub fn build(self) -> Result<HtmlSanitizer<S>> {
        if let Some(bad) = self.allowed_tags.iter().find(|t| !is_valid_tag_name(t)) {
            return Err(SafeHtmlError::InvalidTagName(bad.clone()));
        }

        let mut handlers = HashMap::with_capacity(self.handlers.len());
        for (tag, handler) in self.handlers {
            if !self.allowed_tags.contains(&tag) {
                // Built-in handlers simply lapse with their tag.
                if !self.custom.contains(&tag) {
                    continue;
                }
                return Err(SafeHtmlError::Config(format!(
                    "handler registered for tag <{tag}> which is not allowed"
                )));
            }
            handlers.insert(tag, handler);
        }

        tracing::debug!(
            "Built sanitizer allowing {} tags with {} handlers",
            self.allowed_tags.len(),
            handlers.len()
        );
        let policy = Policy::new(self.allowed_tags, handlers);
        Ok(HtmlSanitizer::new(Arc::new(policy), self.source))
    }
}

/// Tag names are emitted verbatim, so only `[a-z][a-z0-9]*` is accepted.
fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
