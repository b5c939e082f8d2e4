//! Core logger types and traits

pub mod args;
pub mod common_fields;
pub mod config;
pub mod encoder;
pub mod entry;
pub mod error;
pub mod field;
pub mod level;
pub mod log_core;
pub mod logger;
pub mod metrics;
pub mod normalize;
#[cfg(feature = "opentelemetry")]
pub mod otel;
pub mod sink;
pub mod template;
pub mod timestamp;
pub mod trace;

pub use args::{Arg, Value};
pub use config::{LoggerConfig, OutputTarget};
pub use encoder::{
    encode_fields, new_encoder, CallerEncoding, ConsoleEncoder, DurationEncoding, Encoder,
    EncoderConfig, Encoding, JsonEncoder, LevelEncoding,
};
pub use entry::{Caller, Entry};
pub use error::{LoggerError, Result};
pub use field::{
    ArrayEncoder, ArrayMarshaler, Field, FieldKind, FieldValue, ObjectEncoder, ObjectMarshaler,
    NIL_ERROR,
};
pub use level::{AtomicLevel, Level};
pub use log_core::{IoCore, LogCore, NopCore};
pub use logger::{CheckedEntry, FatalHook, Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use normalize::{normalize, InvalidPair, InvalidPairs, Normalized};
#[cfg(feature = "opentelemetry")]
pub use otel::SpanTrace;
pub use sink::WriteSyncer;
pub use template::render_message;
pub use timestamp::TimestampFormat;
pub use trace::{trace_id, TraceCarrier, TraceId, TracingContext, NO_TRACE_ID, TRACE_ID_KEY};
