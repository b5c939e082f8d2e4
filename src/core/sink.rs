//! Output destination trait

use super::error::Result;

/// Byte destination for encoded records.
///
/// A core serialises access with a lock, so implementations only see one
/// writer at a time and every record arrives as one contiguous buffer.
pub trait WriteSyncer: Send {
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Flush buffered bytes to the underlying device.
    fn sync(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}

impl<W: WriteSyncer + ?Sized> WriteSyncer for Box<W> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }

    fn sync(&mut self) -> Result<()> {
        (**self).sync()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
