//! Sink implementations

pub mod buffer;
pub mod console;
pub mod file;

pub use buffer::BufferSink;
pub use console::{StderrSink, StdoutSink};
pub use file::FileSink;

pub use crate::core::WriteSyncer;
