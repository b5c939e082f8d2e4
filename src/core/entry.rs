//! Log record metadata handed to a core

use super::level::Level;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Caller {
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }

    /// `file:line` with the file trimmed to its last directory, e.g. `core/logger.rs:42`.
    pub fn short(&self) -> String {
        let trimmed = match self.file.rfind(['/', '\\']) {
            Some(last) => match self.file[..last].rfind(['/', '\\']) {
                Some(prev) => &self.file[prev + 1..],
                None => self.file,
            },
            None => self.file,
        };
        format!("{}:{}", trimmed, self.line)
    }

    pub fn full(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub logger_name: Option<String>,
    pub message: String,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}

impl Entry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one call can never produce what looks like several records.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: Level, message: &str) -> Self {
        Self {
            level,
            time: Utc::now(),
            logger_name: None,
            message: Self::sanitize_message(message),
            caller: None,
            stack: None,
        }
    }

    pub fn with_name(mut self, name: Option<&str>) -> Self {
        self.logger_name = name.map(str::to_string);
        self
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_stack(mut self, stack: String) -> Self {
        self.stack = Some(stack);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_sanitized() {
        let entry = Entry::new(Level::Info, "line one\nfake record\tend\r");
        assert_eq!(entry.message, "line one\\nfake record\\tend\\r");
    }

    #[test]
    fn test_caller_short_form() {
        let caller = Caller {
            file: "src/core/logger.rs",
            line: 42,
            column: 9,
        };
        assert_eq!(caller.short(), "core/logger.rs:42");
        assert_eq!(caller.full(), "src/core/logger.rs:42");

        let bare = Caller {
            file: "main.rs",
            line: 1,
            column: 1,
        };
        assert_eq!(bare.short(), "main.rs:1");
    }

    #[test]
    fn test_caller_from_track_caller() {
        #[track_caller]
        fn here() -> Caller {
            Caller::from_location(Location::caller())
        }

        let caller = here();
        assert!(caller.file.ends_with("entry.rs"));
        assert!(caller.line > 0);
    }
}
