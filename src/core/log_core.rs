//! Cores: the collaborators that encode and emit records
//!
//! A [`Logger`](super::logger::Logger) decides *whether* and *what* to log.
//! A [`LogCore`] decides *how*: it owns the encoder, the sink and the fields
//! accumulated through `with`.

use super::encoder::Encoder;
use super::entry::Entry;
use super::error::Result;
use super::field::Field;
use super::level::{AtomicLevel, Level};
use super::sink::WriteSyncer;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

pub trait LogCore: Send + Sync {
    fn enabled(&self, level: Level) -> bool;

    /// A core that adds `fields` to every record it writes. The receiver is
    /// left unchanged.
    fn with(&self, fields: &[Field]) -> Arc<dyn LogCore>;

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()>;

    fn sync(&self) -> Result<()>;
}

/// Core that writes encoded records to a [`WriteSyncer`].
///
/// Cores derived through `with` share the sink and the level gate with the
/// core they were derived from.
#[derive(Clone)]
pub struct IoCore {
    encoder: Arc<dyn Encoder>,
    sink: Arc<Mutex<Box<dyn WriteSyncer>>>,
    level: AtomicLevel,
    context: Vec<Field>,
}

impl IoCore {
    pub fn new(encoder: Arc<dyn Encoder>, sink: Box<dyn WriteSyncer>, level: AtomicLevel) -> Self {
        Self {
            encoder,
            sink: Arc::new(Mutex::new(sink)),
            level,
            context: Vec::new(),
        }
    }

    pub fn level(&self) -> &AtomicLevel {
        &self.level
    }

    pub fn context(&self) -> &[Field] {
        &self.context
    }
}

impl LogCore for IoCore {
    fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn LogCore> {
        let mut child = self.clone();
        child.context.extend_from_slice(fields);
        Arc::new(child)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        // Encode outside the lock; the sink only sees finished lines.
        let line = self.encoder.encode(entry, &self.context, fields)?;
        self.sink.lock().write_all(&line)
    }

    fn sync(&self) -> Result<()> {
        self.sink.lock().sync()
    }
}

impl fmt::Debug for IoCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoCore")
            .field("sink", &self.sink.lock().name())
            .field("level", &self.level)
            .field("context", &self.context)
            .finish()
    }
}

/// Core that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopCore;

impl LogCore for NopCore {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn with(&self, _fields: &[Field]) -> Arc<dyn LogCore> {
        Arc::new(NopCore)
    }

    fn write(&self, _entry: &Entry, _fields: &[Field]) -> Result<()> {
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
