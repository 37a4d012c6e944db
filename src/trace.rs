//! Scoped call tracing.
//!
//! Each protocol call (`connect`, `start`, completion) enters a `trace` span for
//! its own duration. Nesting comes from the span stack of the calling thread, so
//! a subscriber renders the chain as an indented tree without any shared
//! counter.

use tracing::span::EnteredSpan;

/// Guard for one traced call; the span closes when it is dropped.
#[must_use = "the span closes as soon as the scope is dropped"]
pub(crate) struct TraceScope {
    _span: EnteredSpan,
}

impl TraceScope {
    /// Enter a span named after the protocol step and the type performing it.
    #[inline]
    pub(crate) fn enter(step: &'static str, subject: &'static str) -> Self {
        let span = tracing::trace_span!("pex", step, subject);
        Self {
            _span: span.entered(),
        }
    }
}

/// Short type name used as the span subject.
#[inline]
pub(crate) fn subject<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
