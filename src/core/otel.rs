//! Trace ids from OpenTelemetry span contexts
//!
//! Enabled by the `opentelemetry` feature.

use super::trace::{TraceCarrier, TraceId};
use opentelemetry::trace::{SpanContext, TraceContextExt};
use opentelemetry::Context;

/// A [`TraceCarrier`] holding the trace id of an OpenTelemetry span.
///
/// ```ignore
/// let span = SpanTrace::current();
/// logger.info(&span, "request served", kv!["status", 200]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanTrace {
    trace_id: Option<String>,
}

impl SpanTrace {
    pub fn from_span_context(span: &SpanContext) -> Self {
        let raw = u128::from_be_bytes(span.trace_id().to_bytes());
        Self {
            trace_id: TraceId::from_u128(raw).map(|id| id.to_string()),
        }
    }

    pub fn from_context(cx: &Context) -> Self {
        Self::from_span_context(cx.span().span_context())
    }

    /// The span active on this thread, if any.
    pub fn current() -> Self {
        Self::from_context(&Context::current())
    }
}

impl From<&SpanContext> for SpanTrace {
    fn from(span: &SpanContext) -> Self {
        Self::from_span_context(span)
    }
}

impl TraceCarrier for SpanTrace {
    fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}
