//! Main logger implementation
//!
//! Every leveled method funnels into one of two paths:
//!
//! - keyed (`info`, `infow`, ...): gate check, argument normalisation,
//!   diagnostics for malformed arguments, then the record itself;
//! - formatted (`infof`, ...): gate check, message rendering, then the
//!   record with no fields.
//!
//! Below [`Level::DPanic`] the gate is checked before anything is built, so a
//! disabled call costs one atomic load.

use super::{
    args::Arg,
    encoder::{new_encoder, EncoderConfig, Encoding},
    entry::{Caller, Entry},
    error::Result,
    field::Field,
    level::{AtomicLevel, Level},
    log_core::{IoCore, LogCore, NopCore},
    metrics::LoggerMetrics,
    normalize::{
        normalize, Normalized, DANGLING_KEY_FIELD, DANGLING_KEY_MSG, INVALID_PAIRS_FIELD,
        NON_STRING_KEY_MSG,
    },
    sink::WriteSyncer,
    template::render_message,
    trace::{trace_id, TraceCarrier},
};
use crate::sinks::StderrSink;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Exit status used by [`FatalHook::Exit`].
pub const FATAL_EXIT_CODE: i32 = 1;

/// What happens after a Fatal record has been written and synced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FatalHook {
    /// Terminate the process with [`FATAL_EXIT_CODE`].
    #[default]
    Exit,
    /// Panic with the record's message, so tests can observe Fatal calls.
    Panic,
}

#[derive(Debug, Clone)]
struct Options {
    development: bool,
    add_caller: bool,
    stacktrace_level: Level,
    fatal_hook: FatalHook,
}

/// Leveled, structured logger.
///
/// Cheap to clone. Loggers derived through [`Logger::named`] and
/// [`Logger::with`] share the level gate, the sink and the metrics of the
/// logger they were derived from.
///
/// # Example
/// ```
/// use rust_logger_facade::prelude::*;
///
/// let logger = Logger::builder()
///     .level(Level::Debug)
///     .sink(BufferSink::new())
///     .build()
///     .named("billing");
///
/// let ctx = TracingContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7");
/// logger.info(&ctx, "invoice issued", kv!["invoice", 1042, "amount", 99.5]);
/// logger.debugw("cache miss", kv![common_fields::query("select * from invoices")]);
/// ```
#[derive(Clone)]
pub struct Logger {
    core: Arc<dyn LogCore>,
    level: AtomicLevel,
    name: Option<String>,
    options: Arc<Options>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Production logger: JSON lines on stderr at Info and above.
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Development logger: console lines on stderr at Debug and above,
    /// stack traces from Warn, and DPanic records panic.
    #[must_use]
    pub fn development() -> Self {
        LoggerBuilder::for_development().build()
    }

    /// Logger that writes nothing. Panic and Fatal still take effect.
    #[must_use]
    pub fn nop() -> Self {
        LoggerBuilder::new().core(Arc::new(NopCore)).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Child logger whose name is this logger's name followed by `.segment`.
    ///
    /// An empty segment returns a logger equivalent to this one.
    #[must_use]
    pub fn named(&self, segment: &str) -> Logger {
        if segment.is_empty() {
            return self.clone();
        }

        let mut child = self.clone();
        child.name = Some(match &self.name {
            Some(parent) => format!("{}.{}", parent, segment),
            None => segment.to_string(),
        });
        child
    }

    /// Child logger that adds `fields` to every record it writes.
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }

        let mut child = self.clone();
        child.core = self.core.with(fields);
        child
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn level(&self) -> Level {
        self.level.level()
    }

    /// Change the threshold of this logger and of every logger sharing its gate.
    pub fn set_level(&self, level: Level) {
        self.level.set_level(level);
    }

    /// Handle to the shared gate, for wiring into reload hooks.
    pub fn atomic_level(&self) -> AtomicLevel {
        self.level.clone()
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level) && self.core.enabled(level)
    }

    pub fn is_development(&self) -> bool {
        self.options.development
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush the sink.
    pub fn sync(&self) -> Result<()> {
        self.core.sync().map_err(|e| {
            self.metrics.record_sync_failure();
            e
        })
    }

    /// Prepare a record at `level` without writing it.
    ///
    /// Returns `None` when `level` is below DPanic and disabled. The caller
    /// then builds its fields only if an entry came back.
    #[track_caller]
    pub fn check(&self, level: Level, msg: &str) -> Option<CheckedEntry<'_>> {
        if !self.should_log(level) {
            return None;
        }
        Some(self.checked(level, msg, Location::caller()))
    }

    /// Keyed record at an arbitrary level.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(level, msg, args, None);
    }

    // Context methods: keyed record plus a `traceId` field from `ctx`.

    #[track_caller]
    pub fn debug(&self, ctx: &dyn TraceCarrier, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Debug, msg, args, Some(ctx));
    }

    /// Logs at Info, adding the trace id of `ctx` (or `"unknown"`).
    #[track_caller]
    pub fn info(&self, ctx: &dyn TraceCarrier, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Info, msg, args, Some(ctx));
    }

    #[track_caller]
    pub fn warn(&self, ctx: &dyn TraceCarrier, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Warn, msg, args, Some(ctx));
    }

    #[track_caller]
    pub fn error(&self, ctx: &dyn TraceCarrier, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Error, msg, args, Some(ctx));
    }

    /// Logs at DPanic; panics afterwards in development mode.
    #[track_caller]
    pub fn dpanic(&self, ctx: &dyn TraceCarrier, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::DPanic, msg, args, Some(ctx));
    }

    /// Logs at Panic, then panics.
    #[track_caller]
    pub fn panic(&self, ctx: &dyn TraceCarrier, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Panic, msg, args, Some(ctx));
    }

    /// Logs at Fatal, syncs, then runs the fatal hook.
    #[track_caller]
    pub fn fatal(&self, ctx: &dyn TraceCarrier, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Fatal, msg, args, Some(ctx));
    }

    // Keyed methods without a context.

    #[track_caller]
    pub fn debugw(&self, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Debug, msg, args, None);
    }

    /// Logs at Info. `args` may mix fields and loose key/value pairs:
    ///
    /// ```
    /// # use rust_logger_facade::prelude::*;
    /// # let logger = Logger::nop();
    /// logger.infow("order placed", kv![common_fields::product_id(7), "qty", 2]);
    /// ```
    #[track_caller]
    pub fn infow(&self, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Info, msg, args, None);
    }

    #[track_caller]
    pub fn warnw(&self, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Warn, msg, args, None);
    }

    #[track_caller]
    pub fn errorw(&self, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Error, msg, args, None);
    }

    #[track_caller]
    pub fn dpanicw(&self, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::DPanic, msg, args, None);
    }

    #[track_caller]
    pub fn panicw(&self, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Panic, msg, args, None);
    }

    #[track_caller]
    pub fn fatalw(&self, msg: &str, args: &[Arg<'_>]) {
        self.log_keyed(Level::Fatal, msg, args, None);
    }

    // Formatted methods. See `render_message` for the template rules.

    #[deprecated(since = "0.1.0", note = "use `debug` or `debugw` with structured fields")]
    #[track_caller]
    pub fn debugf(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_formatted(Level::Debug, template, args);
    }

    /// Logs a message rendered from `template` at Info, with no fields.
    #[deprecated(since = "0.1.0", note = "use `info` or `infow` with structured fields")]
    #[track_caller]
    pub fn infof(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_formatted(Level::Info, template, args);
    }

    #[deprecated(since = "0.1.0", note = "use `warn` or `warnw` with structured fields")]
    #[track_caller]
    pub fn warnf(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_formatted(Level::Warn, template, args);
    }

    #[deprecated(since = "0.1.0", note = "use `error` or `errorw` with structured fields")]
    #[track_caller]
    pub fn errorf(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_formatted(Level::Error, template, args);
    }

    #[deprecated(since = "0.1.0", note = "use `dpanic` or `dpanicw` with structured fields")]
    #[track_caller]
    pub fn dpanicf(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_formatted(Level::DPanic, template, args);
    }

    #[deprecated(since = "0.1.0", note = "use `panic` or `panicw` with structured fields")]
    #[track_caller]
    pub fn panicf(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_formatted(Level::Panic, template, args);
    }

    #[deprecated(since = "0.1.0", note = "use `fatal` or `fatalw` with structured fields")]
    #[track_caller]
    pub fn fatalf(&self, template: &str, args: &[&dyn fmt::Display]) {
        self.log_formatted(Level::Fatal, template, args);
    }

    #[inline]
    fn should_log(&self, level: Level) -> bool {
        level.is_terminal() || self.enabled(level)
    }

    #[track_caller]
    fn log_keyed(
        &self,
        level: Level,
        msg: &str,
        args: &[Arg<'_>],
        ctx: Option<&dyn TraceCarrier>,
    ) {
        if !self.should_log(level) {
            return;
        }

        let caller = Location::caller();
        let mut normalized = normalize(args);
        if let Some(ctx) = ctx {
            normalized.fields.push(trace_id(ctx));
        }
        self.report_malformed(&mut normalized, caller);
        self.checked(level, msg, caller).write(&normalized.fields);
    }

    #[track_caller]
    fn log_formatted(&self, level: Level, template: &str, args: &[&dyn fmt::Display]) {
        if !self.should_log(level) {
            return;
        }

        let message = render_message(template, args);
        self.checked(level, &message, Location::caller()).write(&[]);
    }

    /// Write the diagnostics collected during normalisation. They are DPanic
    /// records but never trigger the development panic.
    fn report_malformed(&self, normalized: &mut Normalized, caller: &'static Location<'static>) {
        if let Some(key) = normalized.dangling.take() {
            self.write_diagnostic(DANGLING_KEY_MSG, Field::new(DANGLING_KEY_FIELD, key), caller);
        }
        if !normalized.invalid.is_empty() {
            let invalid = std::mem::take(&mut normalized.invalid);
            self.write_diagnostic(
                NON_STRING_KEY_MSG,
                Field::array(INVALID_PAIRS_FIELD, invalid),
                caller,
            );
        }
    }

    fn write_diagnostic(&self, msg: &str, field: Field, caller: &'static Location<'static>) {
        let entry = self.entry(Level::DPanic, msg, caller);
        self.metrics.record_diagnostic();
        self.write_entry(&entry, &[field]);
    }

    fn checked(&self, level: Level, msg: &str, caller: &'static Location<'static>) -> CheckedEntry<'_> {
        CheckedEntry {
            logger: self,
            entry: self.entry(level, msg, caller),
        }
    }

    fn entry(&self, level: Level, msg: &str, caller: &'static Location<'static>) -> Entry {
        let mut entry = Entry::new(level, msg).with_name(self.name());
        if self.options.add_caller {
            entry = entry.with_caller(Caller::from_location(caller));
        }
        if level >= self.options.stacktrace_level {
            entry = entry.with_stack(Backtrace::force_capture().to_string());
        }
        entry
    }

    fn write_entry(&self, entry: &Entry, fields: &[Field]) {
        match self.core.write(entry, fields) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(e) => {
                self.metrics.record_failed();
                eprintln!(
                    "[LOGGER ERROR] Failed to write {} record '{}': {}",
                    entry.level, entry.message, e
                );
            }
        }
    }

    fn after_write(&self, entry: &Entry) {
        match entry.level {
            Level::DPanic if self.options.development => panic!("{}", entry.message),
            Level::Panic => panic!("{}", entry.message),
            Level::Fatal => {
                if let Err(e) = self.sync() {
                    eprintln!("[LOGGER ERROR] Failed to sync before exit: {}", e);
                }
                match self.options.fatal_hook {
                    FatalHook::Exit => std::process::exit(FATAL_EXIT_CODE),
                    FatalHook::Panic => panic!("{}", entry.message),
                }
            }
            _ => {}
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("options", &self.options)
            .finish()
    }
}

/// A record that passed the level check and waits for its fields.
#[must_use = "a checked entry is not logged until `write` is called"]
pub struct CheckedEntry<'l> {
    logger: &'l Logger,
    entry: Entry,
}

impl CheckedEntry<'_> {
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Write the record, then panic or exit if its level demands it.
    pub fn write(self, fields: &[Field]) {
        let CheckedEntry { logger, entry } = self;
        logger.write_entry(&entry, fields);
        logger.after_write(&entry);
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Without an explicit [`core`](LoggerBuilder::core) the builder assembles an
/// [`IoCore`] from the encoding, the encoder config and the sink (stderr by
/// default). The built logger and that core share one level gate.
///
/// # Example
/// ```
/// use rust_logger_facade::prelude::*;
///
/// let logger = Logger::builder()
///     .level(Level::Warn)
///     .encoding(Encoding::Console)
///     .sink(StdoutSink::new())
///     .add_caller(false)
///     .build();
/// assert_eq!(logger.level(), Level::Warn);
/// ```
pub struct LoggerBuilder {
    level: Level,
    development: bool,
    encoding: Encoding,
    encoder_config: EncoderConfig,
    sink: Option<Box<dyn WriteSyncer>>,
    core: Option<Arc<dyn LogCore>>,
    add_caller: bool,
    stacktrace_level: Level,
    fatal_hook: FatalHook,
    name: Option<String>,
}

impl LoggerBuilder {
    /// Production defaults: Info, JSON, caller on, stack traces from Error.
    pub fn new() -> Self {
        Self {
            level: Level::Info,
            development: false,
            encoding: Encoding::Json,
            encoder_config: EncoderConfig::production(),
            sink: None,
            core: None,
            add_caller: true,
            stacktrace_level: Level::Error,
            fatal_hook: FatalHook::Exit,
            name: None,
        }
    }

    /// Development defaults: Debug, console encoding, caller on, stack
    /// traces from Warn, development mode.
    pub fn for_development() -> Self {
        Self {
            level: Level::Debug,
            development: true,
            encoding: Encoding::Console,
            encoder_config: EncoderConfig::development(),
            stacktrace_level: Level::Warn,
            ..Self::new()
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// In development mode DPanic records panic after being written.
    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoder_config(mut self, config: EncoderConfig) -> Self {
        self.encoder_config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<W: WriteSyncer + 'static>(mut self, sink: W) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Use `core` instead of building one. Encoding and sink settings are
    /// then ignored.
    #[must_use = "builder methods return a new value"]
    pub fn core(mut self, core: Arc<dyn LogCore>) -> Self {
        self.core = Some(core);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    /// Records at or above `level` carry a captured backtrace.
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: Level) -> Self {
        self.stacktrace_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fatal_hook(mut self, hook: FatalHook) -> Self {
        self.fatal_hook = hook;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Logger {
        let level = AtomicLevel::new(self.level);
        let core = match self.core {
            Some(core) => core,
            None => {
                let sink = self
                    .sink
                    .unwrap_or_else(|| Box::new(StderrSink::new()) as Box<dyn WriteSyncer>);
                let encoder = new_encoder(self.encoding, self.encoder_config);
                Arc::new(IoCore::new(encoder, sink, level.clone())) as Arc<dyn LogCore>
            }
        };

        Logger {
            core,
            level,
            name: self.name.filter(|name| !name.is_empty()),
            options: Arc::new(Options {
                development: self.development,
                add_caller: self.add_caller,
                stacktrace_level: self.stacktrace_level,
                fatal_hook: self.fatal_hook,
            }),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::core::trace::{TracingContext, NO_TRACE_ID, TRACE_ID_KEY};
    use crate::kv;
    use crate::observer::{self, ObservedLogs};
    use crate::sinks::BufferSink;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    const VALID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";

    fn observed(level: Level) -> (Logger, ObservedLogs) {
        observer::new_logger(level)
    }

    struct FailingSink;

    impl WriteSyncer for FailingSink {
        fn write_all(&mut self, _buf: &[u8]) -> Result<()> {
            Err(LoggerError::other("device unplugged"))
        }

        fn sync(&mut self) -> Result<()> {
            Err(LoggerError::sync_failed("failing", "device unplugged"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().sink(BufferSink::new()).build();
        assert_eq!(logger.level(), Level::Info);
        assert!(!logger.is_development());
        assert!(logger.name().is_none());

        let dev = LoggerBuilder::for_development().sink(BufferSink::new()).build();
        assert_eq!(dev.level(), Level::Debug);
        assert!(dev.is_development());
    }

    #[test]
    fn test_named_concatenates_segments() {
        let (logger, _) = observed(Level::Info);
        let child = logger.named("http").named("server");
        assert_eq!(child.name(), Some("http.server"));
        assert!(logger.name().is_none());
    }

    #[test]
    fn test_named_empty_segment_is_identity() {
        let (logger, logs) = observed(Level::Info);
        let parent = logger.named("svc");
        let same = parent.named("");
        assert_eq!(same.name(), parent.name());

        same.infow("hello", kv![]);
        assert_eq!(logs.all()[0].entry.logger_name.as_deref(), Some("svc"));
    }

    #[test]
    fn test_with_isolates_siblings() {
        let (logger, logs) = observed(Level::Info);
        let base = logger.with(&[Field::string("f1", "a")]);
        let nested = base.with(&[Field::string("f2", "b")]);
        let sibling = logger.with(&[Field::string("f1", "a")]);

        nested.infow("nested", kv![]);
        sibling.infow("sibling", kv![]);

        let records = logs.all();
        assert_eq!(records[0].keys(), ["f1", "f2"]);
        assert_eq!(records[1].keys(), ["f1"]);
    }

    #[test]
    fn test_level_gate_is_shared() {
        let (logger, logs) = observed(Level::Info);
        let child = logger.named("child").with(&[Field::bool("c", true)]);

        child.debugw("dropped", kv![]);
        logger.set_level(Level::Debug);
        child.debugw("kept", kv![]);

        assert_eq!(logs.len(), 1);
        assert_eq!(logs.all()[0].entry.message, "kept");
        assert_eq!(child.level(), Level::Debug);
    }

    #[test]
    fn test_context_method_appends_trace_id() {
        let (logger, logs) = observed(Level::Info);
        let ctx = TracingContext::new(VALID, "span");

        logger.info(&ctx, "traced", kv!["k1", 1]);
        logger.info(&(), "untraced", kv![]);

        let records = logs.all();
        assert_eq!(records[0].keys(), ["k1", TRACE_ID_KEY]);
        assert_eq!(records[0].field(TRACE_ID_KEY).and_then(|v| v.as_str()), Some(VALID));
        assert_eq!(
            records[1].field(TRACE_ID_KEY).and_then(|v| v.as_str()),
            Some(NO_TRACE_ID)
        );
    }

    #[test]
    fn test_diagnostics_precede_record() {
        let (logger, logs) = observed(Level::Info);
        logger.infow("msg", kv![42, "v", "k", 1, "orphan"]);

        let records = logs.all();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].entry.message, DANGLING_KEY_MSG);
        assert_eq!(records[0].entry.level, Level::DPanic);
        assert_eq!(records[1].entry.message, NON_STRING_KEY_MSG);
        assert_eq!(records[2].entry.message, "msg");
        assert_eq!(records[2].keys(), ["k"]);
        assert_eq!(logger.metrics().diagnostics(), 2);
    }

    #[test]
    fn test_diagnostics_do_not_panic_in_development() {
        let (core, logs) = observer::ObservedCore::new(Level::Debug);
        let logger = LoggerBuilder::for_development().core(Arc::new(core)).build();

        logger.infow("msg", kv!["orphan"]);
        assert_eq!(logs.len(), 2);
    }

    #[test]
    fn test_dpanicw_logs_at_dpanic() {
        let (logger, logs) = observed(Level::Info);
        logger.dpanicw("invariant broken", kv!["k", 1]);
        assert_eq!(logs.filter_level(Level::DPanic).len(), 1);
    }

    #[test]
    #[should_panic(expected = "invariant broken")]
    fn test_dpanic_panics_in_development() {
        let (core, _logs) = observer::ObservedCore::new(Level::Debug);
        let logger = LoggerBuilder::for_development().core(Arc::new(core)).build();
        logger.dpanicw("invariant broken", kv![]);
    }

    #[test]
    fn test_panic_writes_then_panics() {
        let (logger, logs) = observed(Level::Fatal);
        let result = catch_unwind(AssertUnwindSafe(|| {
            logger.panicw("boom", kv!["k", 1]);
        }));

        assert!(result.is_err());
        assert_eq!(logs.filter_message("boom").len(), 1);
    }

    #[test]
    fn test_fatal_syncs_then_runs_hook() {
        let buffer = BufferSink::new();
        let logger = Logger::builder()
            .sink(buffer.clone())
            .fatal_hook(FatalHook::Panic)
            .build();

        let result = catch_unwind(AssertUnwindSafe(|| {
            logger.fatal(&(), "going down", kv![]);
        }));

        assert!(result.is_err());
        assert_eq!(buffer.sync_count(), 1);
        assert!(buffer.contents().contains("going down"));
    }

    #[test]
    fn test_check_skips_gate_only_for_terminal_levels() {
        let (logger, logs) = observed(Level::Fatal);
        assert!(logger.check(Level::Error, "nope").is_none());

        let checked = logger.check(Level::DPanic, "yes").expect("DPanic always passes");
        assert_eq!(checked.entry().level, Level::DPanic);
        checked.write(&[Field::int64("n", 1)]);
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn test_caller_and_stacktrace() {
        let (logger, logs) = observed(Level::Debug);
        logger.infow("with caller", kv![]);
        logger.errorw("with stack", kv![]);

        let records = logs.all();
        let caller = records[0].entry.caller.expect("caller recorded");
        assert!(caller.file.ends_with("logger.rs"), "{}", caller.file);
        assert!(records[0].entry.stack.is_none());
        assert!(records[1].entry.stack.is_some());
    }

    #[test]
    #[allow(deprecated)]
    fn test_formatted_methods() {
        let (logger, logs) = observed(Level::Info);
        logger.infof("user {} logged in", &[&"ann"]);
        logger.debugf("dropped {}", &[&1]);
        logger.warnf("", &[&"a", &"b"]);

        let records = logs.all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entry.message, "user ann logged in");
        assert!(records[0].context.is_empty());
        assert_eq!(records[1].entry.message, "ab");
    }

    #[test]
    fn test_write_failure_is_counted_not_propagated() {
        let logger = Logger::builder().sink(FailingSink).build();
        logger.infow("lost", kv![]);

        assert_eq!(logger.metrics().write_failures(), 1);
        assert_eq!(logger.metrics().records_written(), 0);
        assert!(matches!(logger.sync(), Err(LoggerError::SyncFailed { .. })));
        assert_eq!(logger.metrics().sync_failures(), 1);
    }

    #[test]
    fn test_nop_logger() {
        let logger = Logger::nop();
        assert!(!logger.enabled(Level::Error));
        logger.errorw("nothing", kv!["k", 1]);
        assert!(logger.sync().is_ok());
    }
}
