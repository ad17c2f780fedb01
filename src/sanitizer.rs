//! The [`Sanitizer`] trait and the whitelist [`HtmlSanitizer`].

use std::sync::Arc;

use crate::filter::Filter;
use crate::policy::Policy;
use crate::tokenizer::{EventSource, StreamingSource};

/// Trait for HTML sanitizers.
///
/// Each call receives untrusted HTML and returns a string that is safe to
/// embed in an HTML body. Implementations must be `Send + Sync` so one
/// sanitizer can serve many threads.
pub trait Sanitizer: Send + Sync {
    /// Sanitize the given HTML, returning the safe result.
    fn sanitize(&self, html: &str) -> String;
}

/// Whitelist sanitizer: an immutable [`Policy`] plus an [`EventSource`].
///
/// Cheap to clone; clones share the same policy. Every call to
/// [`sanitize`](Sanitizer::sanitize) runs a fresh [`Filter`], so calls are
/// independent and may run concurrently.
///
/// Build one with [`SanitizerBuilder`](crate::SanitizerBuilder).
pub struct HtmlSanitizer<S: EventSource = StreamingSource> {
    policy: Arc<Policy>,
    source: S,
}

impl<S: EventSource> HtmlSanitizer<S> {
    pub(crate) fn new(policy: Arc<Policy>, source: S) -> Self {
        Self { policy, source }
    }

    /// The policy this sanitizer enforces.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}

impl<S: EventSource + Clone> Clone for HtmlSanitizer<S> {
    fn clone(&self) -> Self {
        Self {
            policy: Arc::clone(&self.policy),
            source: self.source.clone(),
        }
    }
}

impl<S: EventSource> Sanitizer for HtmlSanitizer<S> {
    fn sanitize(&self, html: &str) -> String {
        let mut filter = Filter::new(&self.policy);
        for event in self.source.events(html) {
            filter.feed(event);
        }
        filter.render()
    }
}
