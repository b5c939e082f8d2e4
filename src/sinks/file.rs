//! File sink implementation

use crate::core::{LoggerError, Result, WriteSyncer};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends records to a file through a buffer.
///
/// `sync` flushes the buffer and asks the OS to persist the file. After
/// [`FileSink::close`] every write and sync fails with `SinkClosed`.
pub struct FileSink {
    path: PathBuf,
    label: String,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            label: path.display().to_string(),
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the file handle.
    pub fn close(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer
                .flush()
                .map_err(|e| LoggerError::sync_failed(&self.label, e.to_string())),
            None => Ok(()),
        }
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        match self.writer.as_mut() {
            Some(writer) => Ok(writer),
            None => Err(LoggerError::sink_closed(&self.label)),
        }
    }
}

impl WriteSyncer for FileSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.writer()?
            .write_all(buf)
            .map_err(|e| LoggerError::io_operation("writing record", "file sink", e))
    }

    fn sync(&mut self) -> Result<()> {
        let label = self.label.clone();
        let writer = self.writer()?;
        writer
            .flush()
            .and_then(|()| writer.get_ref().sync_all())
            .map_err(|e| LoggerError::sync_failed(label, e.to_string()))
    }

    fn name(&self) -> &str {
        &self.label
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to flush '{}' on drop: {}", self.label, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_sync() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let mut sink = FileSink::new(&path).unwrap();
        sink.write_all(b"{\"message\":\"hello\"}\n").unwrap();
        sink.sync().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"message\":\"hello\"}\n");
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(&path, "old\n").unwrap();

        let mut sink = FileSink::new(&path).unwrap();
        sink.write_all(b"new\n").unwrap();
        drop(sink);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_closed_sink_rejects_io() {
        let dir = tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("app.log")).unwrap();
        sink.close().unwrap();

        assert!(matches!(sink.write_all(b"x"), Err(LoggerError::SinkClosed { .. })));
        assert!(matches!(sink.sync(), Err(LoggerError::SinkClosed { .. })));
    }

    #[test]
    fn test_open_failure_has_context() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("app.log");
        let err = FileSink::new(missing).err().unwrap();
        assert!(err.to_string().contains("opening log file"));
    }
}
