//! Standard stream sinks

use crate::core::{LoggerError, Result, WriteSyncer};
use std::io::Write;

/// Writes records to the process's standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl StderrSink {
    pub fn new() -> Self {
        Self
    }
}

impl WriteSyncer for StderrSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        std::io::stderr()
            .lock()
            .write_all(buf)
            .map_err(|e| LoggerError::io_operation("writing record", "stderr", e))
    }

    fn sync(&mut self) -> Result<()> {
        std::io::stderr()
            .flush()
            .map_err(|e| LoggerError::sync_failed("stderr", e.to_string()))
    }

    fn name(&self) -> &str {
        "stderr"
    }
}

/// Writes records to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl WriteSyncer for StdoutSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        std::io::stdout()
            .lock()
            .write_all(buf)
            .map_err(|e| LoggerError::io_operation("writing record", "stdout", e))
    }

    fn sync(&mut self) -> Result<()> {
        std::io::stdout()
            .flush()
            .map_err(|e| LoggerError::sync_failed("stdout", e.to_string()))
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_streams() {
        let mut err = StderrSink::new();
        assert_eq!(err.name(), "stderr");
        assert!(err.write_all(b"").is_ok());
        assert!(err.sync().is_ok());

        let mut out = StdoutSink::new();
        assert_eq!(out.name(), "stdout");
        assert!(out.sync().is_ok());
    }
}
