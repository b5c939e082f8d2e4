//! In-memory core for asserting on what a logger wrote
//!
//! ```
//! use rust_logger_facade::{kv, observer, Level};
//!
//! let (logger, logs) = observer::new_logger(Level::Info);
//! logger.infow("cache warmed", kv!["entries", 128]);
//!
//! let records = logs.filter_message("cache warmed");
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].context_json()["entries"], 128);
//! ```

use crate::core::{
    encode_fields, EncoderConfig, Entry, Field, FieldValue, Level, LogCore, Logger, Result,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// One captured record: its metadata plus every field, `with` fields first.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEntry {
    pub entry: Entry,
    pub context: Vec<Field>,
}

impl LoggedEntry {
    /// Value of the last field with `key`.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.context
            .iter()
            .rev()
            .find(|field| field.key() == key)
            .map(Field::value)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.context.iter().map(Field::key).collect()
    }

    /// Fields as the production JSON encoder would render them.
    pub fn context_json(&self) -> serde_json::Map<String, serde_json::Value> {
        encode_fields(&self.context, &EncoderConfig::production())
    }
}

/// Shared view of the records captured by an [`ObservedCore`].
#[derive(Debug, Clone, Default)]
pub struct ObservedLogs {
    entries: Arc<Mutex<Vec<LoggedEntry>>>,
}

impl ObservedLogs {
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of every record so far, in write order.
    pub fn all(&self) -> Vec<LoggedEntry> {
        self.entries.lock().clone()
    }

    /// Drain the captured records.
    pub fn take_all(&self) -> Vec<LoggedEntry> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn filter_message(&self, message: &str) -> Vec<LoggedEntry> {
        self.filter(|logged| logged.entry.message == message)
    }

    pub fn filter_level(&self, level: Level) -> Vec<LoggedEntry> {
        self.filter(|logged| logged.entry.level == level)
    }

    pub fn filter_field_key(&self, key: &str) -> Vec<LoggedEntry> {
        self.filter(|logged| logged.context.iter().any(|field| field.key() == key))
    }

    fn filter(&self, keep: impl Fn(&LoggedEntry) -> bool) -> Vec<LoggedEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|logged| keep(logged))
            .cloned()
            .collect()
    }

    fn push(&self, logged: LoggedEntry) {
        self.entries.lock().push(logged);
    }
}

/// Core that keeps records in memory instead of encoding them.
#[derive(Debug, Clone)]
pub struct ObservedCore {
    min_level: Level,
    context: Vec<Field>,
    logs: ObservedLogs,
}

impl ObservedCore {
    /// Core capturing records at `min_level` and above, plus the handle to read them.
    pub fn new(min_level: Level) -> (Self, ObservedLogs) {
        let logs = ObservedLogs::default();
        let core = Self {
            min_level,
            context: Vec::new(),
            logs: logs.clone(),
        };
        (core, logs)
    }
}

impl LogCore for ObservedCore {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn LogCore> {
        let mut child = self.clone();
        child.context.extend_from_slice(fields);
        Arc::new(child)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        let mut context = Vec::with_capacity(self.context.len() + fields.len());
        context.extend_from_slice(&self.context);
        context.extend_from_slice(fields);
        self.logs.push(LoggedEntry {
            entry: entry.clone(),
            context,
        });
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

/// Logger gated at `level` whose records land in the returned [`ObservedLogs`].
///
/// The core itself accepts every level, so `set_level` on the logger is the
/// only gate.
pub fn new_logger(level: Level) -> (Logger, ObservedLogs) {
    let (core, logs) = ObservedCore::new(Level::Debug);
    let logger = Logger::builder()
        .level(level)
        .core(Arc::new(core))
        .build();
    (logger, logs)
}
