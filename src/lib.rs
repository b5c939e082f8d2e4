//! # Rust Logger Facade
//!
//! A structured logging facade: leveled logging with typed fields, loose
//! key/value pairs and trace-id injection, over a small synchronous core.
//!
//! ## Features
//!
//! - **Three call styles**: context methods (`info`) add a `traceId` field,
//!   keyed methods (`infow`) take fields and pairs, formatted methods
//!   (`infof`) are kept for migration
//! - **Tolerant arguments**: malformed key/value lists never fail a call;
//!   they produce diagnostic records next to the record itself
//! - **Cheap when disabled**: below DPanic a filtered call is one atomic load
//! - **Child loggers**: `named` and `with` derive loggers that share the
//!   level gate and the sink
//!
//! ```
//! use rust_logger_facade::prelude::*;
//!
//! let logger = Logger::builder().sink(BufferSink::new()).build();
//! let ctx = TracingContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
//!
//! logger.info(&ctx, "payment accepted", kv!["amount", 42.5, common_fields::method("Charge")]);
//! logger.named("worker").warnw("queue depth high", kv!["depth", 1200]);
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod observer;
pub mod sinks;

pub mod prelude {
    pub use crate::core::common_fields;
    pub use crate::core::{
        Arg, AtomicLevel, Encoding, EncoderConfig, Field, FieldValue, Level, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, ObjectEncoder, ObjectMarshaler, Result,
        TraceCarrier, TracingContext,
    };
    pub use crate::kv;
    pub use crate::sinks::{BufferSink, FileSink, StderrSink, StdoutSink};
}

pub use crate::core::common_fields;
pub use crate::core::{
    Arg, ArrayEncoder, ArrayMarshaler, AtomicLevel, CheckedEntry, Encoding, EncoderConfig, Entry,
    FatalHook, Field, FieldKind, FieldValue, Level, LogCore, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, ObjectEncoder, ObjectMarshaler, OutputTarget, Result,
    TimestampFormat, TraceCarrier, TracingContext, Value, WriteSyncer,
};
#[cfg(feature = "opentelemetry")]
pub use crate::core::SpanTrace;
pub use sinks::{BufferSink, FileSink, StderrSink, StdoutSink};
