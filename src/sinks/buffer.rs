//! In-memory sink

use crate::core::{Result, WriteSyncer};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects written bytes in memory. Clones share the same buffer, so a
/// test can hand one clone to a logger and read the output through another.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    bytes: Arc<Mutex<Vec<u8>>>,
    syncs: Arc<Mutex<usize>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Written output split into lines, without line endings.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn sync_count(&self) -> usize {
        *self.syncs.lock()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl WriteSyncer for BufferSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        *self.syncs.lock() += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "buffer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_output() {
        let reader = BufferSink::new();
        let mut writer = reader.clone();

        writer.write_all(b"one\ntwo\n").unwrap();
        writer.sync().unwrap();

        assert_eq!(reader.lines(), vec!["one", "two"]);
        assert_eq!(reader.sync_count(), 1);

        reader.clear();
        assert!(reader.contents().is_empty());
    }
}
