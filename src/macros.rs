//! Macros for building keyed-call arguments.
//!
//! # Examples
//!
//! ```
//! use rust_logger_facade::prelude::*;
//! use rust_logger_facade::{info, kv};
//!
//! let logger = Logger::nop();
//!
//! // Loose pairs, typed fields and trace carriers mix freely
//! let ctx = TracingContext::empty();
//! logger.info(&ctx, "request served", kv!["status", 200, Field::float64("took_ms", 3.2)]);
//!
//! // Shorthand for the keyed methods
//! info!(logger, "cache warmed", "entries", 128);
//! ```

/// Build a `&[Arg]` slice on the stack.
///
/// Each element goes through `Arg::from`, so anything convertible to an
/// `Arg` (fields, trace carriers, strings, numbers, bytes, ...) can be
/// mixed in one list.
///
/// # Examples
///
/// ```
/// use rust_logger_facade::{kv, Arg, Field};
///
/// let args: &[Arg<'_>] = kv!["user", "ann", Field::bool("admin", false)];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        &[] as &[$crate::Arg<'_>]
    };
    ($($arg:expr),+ $(,)?) => {
        &[$($crate::Arg::from($arg)),+]
    };
}

/// Keyed record at the given level.
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::nop();
/// use rust_logger_facade::log;
/// log!(logger, Level::Warn, "slow query", "ms", 850);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, $msg, $crate::kv![$($arg),*])
    };
}

/// Keyed record at Debug.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.debugw($msg, $crate::kv![$($arg),*])
    };
}

/// Keyed record at Info.
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::nop();
/// use rust_logger_facade::info;
/// info!(logger, "server started", "port", 8080);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.infow($msg, $crate::kv![$($arg),*])
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.warnw($msg, $crate::kv![$($arg),*])
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.errorw($msg, $crate::kv![$($arg),*])
    };
}
