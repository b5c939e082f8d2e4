//! Log level definitions and the shared level gate

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Record severity, in ascending order of strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    /// Developer error: panics in development mode, logs like `Error` otherwise.
    DPanic = 4,
    /// Logs, then panics.
    Panic = 5,
    /// Logs, flushes, then terminates the process.
    Fatal = 6,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::DPanic,
        Level::Panic,
        Level::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    pub fn to_lowercase_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Whether writing a record at this level is followed by a control transfer
    /// (panic or process exit) in at least one configuration.
    pub fn is_terminal(&self) -> bool {
        *self >= Level::DPanic
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => Magenta,
            Level::Info => Blue,
            Level::Warn => Yellow,
            Level::Error => Red,
            Level::DPanic | Level::Panic | Level::Fatal => BrightRed,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            3 => Level::Error,
            4 => Level::DPanic,
            5 => Level::Panic,
            _ => Level::Fatal,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_lowercase_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" | "" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "DPANIC" => Ok(Level::DPanic),
            "PANIC" => Ok(Level::Panic),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}

/// Level gate shared by a logger and every logger derived from it.
///
/// Cloning an `AtomicLevel` clones the handle, not the value: a `set_level`
/// through any clone is observed by all of them.
#[derive(Clone)]
pub struct AtomicLevel {
    inner: Arc<AtomicU8>,
}

impl AtomicLevel {
    pub fn new(level: Level) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    #[inline]
    pub fn level(&self) -> Level {
        Level::from_u8(self.inner.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set_level(&self, level: Level) {
        self.inner.store(level as u8, Ordering::Relaxed);
    }

    /// Whether records at `level` pass the gate.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Whether two handles refer to the same gate.
    pub fn same_gate(&self, other: &AtomicLevel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl fmt::Debug for AtomicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicLevel").field(&self.level()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        for pair in Level::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should be below {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_terminal_levels() {
        let terminal: Vec<Level> = Level::ALL.iter().copied().filter(Level::is_terminal).collect();
        assert_eq!(terminal, [Level::DPanic, Level::Panic, Level::Fatal]);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("dpanic".parse::<Level>().unwrap(), Level::DPanic);
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(LoggerError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_level_serde_lowercase() {
        let json = serde_json::to_string(&Level::DPanic).unwrap();
        assert_eq!(json, "\"dpanic\"");
        let level: Level = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(level, Level::Error);
    }

    #[test]
    fn test_atomic_level_shared_between_clones() {
        let gate = AtomicLevel::new(Level::Info);
        let child = gate.clone();

        child.set_level(Level::Error);
        assert_eq!(gate.level(), Level::Error);
        assert!(!gate.enabled(Level::Warn));
        assert!(gate.enabled(Level::Fatal));
        assert!(gate.same_gate(&child));
        assert!(!gate.same_gate(&AtomicLevel::default()));
    }
}
