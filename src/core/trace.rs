//! Distributed-trace correlation
//!
//! Every record written through a context-taking method carries a `traceId`
//! field. When the carrier has no usable trace id the field is still present
//! and holds [`NO_TRACE_ID`], so downstream indexing never sees a gap.

use super::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of the trace-id field.
pub const TRACE_ID_KEY: &str = "traceId";

/// Value of the trace-id field when no valid trace id is available.
pub const NO_TRACE_ID: &str = "unknown";

/// Anything that can report the trace id of the current request scope.
pub trait TraceCarrier {
    fn trace_id(&self) -> Option<&str>;
}

impl TraceCarrier for () {
    fn trace_id(&self) -> Option<&str> {
        None
    }
}

impl<C: TraceCarrier> TraceCarrier for Option<C> {
    fn trace_id(&self) -> Option<&str> {
        self.as_ref().and_then(TraceCarrier::trace_id)
    }
}

impl<C: TraceCarrier + ?Sized> TraceCarrier for &C {
    fn trace_id(&self) -> Option<&str> {
        (**self).trace_id()
    }
}

/// A 128-bit trace identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(u128);

impl TraceId {
    pub fn from_u128(raw: u128) -> Option<Self> {
        (raw != 0).then_some(TraceId(raw))
    }

    /// Parse the 32-hex-digit form. The all-zero id is invalid.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u128::from_str_radix(s, 16).ok().and_then(Self::from_u128)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Tracing context for distributed tracing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingContext {
    /// Trace ID for request correlation
    pub trace_id: String,

    /// Span ID for this operation
    pub span_id: String,

    /// Parent span ID (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
}

impl TracingContext {
    /// Create a new tracing context
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            parent_span_id: None,
        }
    }

    /// Context that carries no trace.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set parent span ID
    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }
}

impl TraceCarrier for TracingContext {
    fn trace_id(&self) -> Option<&str> {
        (!self.trace_id.is_empty()).then_some(self.trace_id.as_str())
    }
}

/// Build the `traceId` field for `carrier`.
///
/// Never fails: a missing or malformed trace id yields [`NO_TRACE_ID`].
pub fn trace_id<C: TraceCarrier + ?Sized>(carrier: &C) -> Field {
    match carrier.trace_id().and_then(TraceId::parse) {
        Some(id) => Field::string(TRACE_ID_KEY, id.to_string()),
        None => Field::string(TRACE_ID_KEY, NO_TRACE_ID),
    }
}

/// Whether `field` is the trace-id field holding the sentinel.
pub fn is_unknown_trace(field: &Field) -> bool {
    field.key() == TRACE_ID_KEY && field.value().as_str() == Some(NO_TRACE_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";

    #[test]
    fn test_valid_trace_id() {
        let ctx = TracingContext::new(VALID, "00f067aa0ba902b7");
        let field = trace_id(&ctx);
        assert_eq!(field.key(), TRACE_ID_KEY);
        assert_eq!(field.value().as_str(), Some(VALID));
        assert!(!is_unknown_trace(&field));
    }

    #[test]
    fn test_uppercase_trace_id_is_normalized() {
        let ctx = TracingContext::new(VALID.to_uppercase(), "span");
        assert_eq!(trace_id(&ctx).value().as_str(), Some(VALID));
    }

    #[test]
    fn test_missing_and_malformed_trace_ids() {
        let cases = [
            TracingContext::empty(),
            TracingContext::new("not-a-trace", "span"),
            TracingContext::new("00000000000000000000000000000000", "span"),
            TracingContext::new("4bf92f3577b34da6a3ce929d0e0e473", "span"),
            TracingContext::new("+bf92f3577b34da6a3ce929d0e0e4736", "span"),
        ];

        for ctx in &cases {
            let field = trace_id(ctx);
            assert!(is_unknown_trace(&field), "{:?} should be unknown", ctx);
        }
        assert!(is_unknown_trace(&trace_id(&())));
        assert!(is_unknown_trace(&trace_id(&None::<TracingContext>)));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let ctx = TracingContext::new(VALID, "span").with_parent("parent");
        assert_eq!(trace_id(&ctx), trace_id(&ctx));

        let empty = TracingContext::empty();
        assert_eq!(trace_id(&empty), trace_id(&empty));
    }

    #[test]
    fn test_trace_id_display_round_trip() {
        let id = TraceId::parse(VALID).unwrap();
        assert_eq!(id.to_string(), VALID);
        assert_eq!(TraceId::from_u128(0), None);
        assert_eq!(TraceId::from_u128(1).unwrap().to_string().len(), 32);
    }
}
