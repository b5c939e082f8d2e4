//! Serializable logger configuration

use super::encoder::{EncoderConfig, Encoding};
use super::error::{LoggerError, Result};
use super::level::Level;
use super::logger::{Logger, LoggerBuilder};
use crate::sinks::{FileSink, StderrSink, StdoutSink};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where records go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Stderr,
    Stdout,
    /// Append to the file at this path.
    File(PathBuf),
}

/// Everything needed to build a [`Logger`], loadable from JSON.
///
/// Missing keys take the production defaults:
///
/// ```
/// use rust_logger_facade::{Level, LoggerConfig};
///
/// let config = LoggerConfig::from_json(r#"{"level": "debug", "output": "stdout"}"#).unwrap();
/// assert_eq!(config.level, Level::Debug);
/// assert!(!config.development);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: Level,
    /// DPanic records panic in development mode.
    pub development: bool,
    pub encoding: Encoding,
    pub encoder: EncoderConfig,
    pub output: OutputTarget,
    pub add_caller: bool,
    pub stacktrace_level: Level,
}

impl LoggerConfig {
    pub fn production() -> Self {
        Self {
            level: Level::Info,
            development: false,
            encoding: Encoding::Json,
            encoder: EncoderConfig::production(),
            output: OutputTarget::Stderr,
            add_caller: true,
            stacktrace_level: Level::Error,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::Debug,
            development: true,
            encoding: Encoding::Console,
            encoder: EncoderConfig::development(),
            output: OutputTarget::Stderr,
            add_caller: true,
            stacktrace_level: Level::Warn,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger config",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.encoder.validate()?;
        if let OutputTarget::File(path) = &self.output {
            if path.as_os_str().is_empty() {
                return Err(LoggerError::config("output", "file path must not be empty"));
            }
        }
        Ok(())
    }

    /// Builder preloaded with this configuration.
    ///
    /// Fails only when the output file cannot be opened.
    pub fn builder(&self) -> Result<LoggerBuilder> {
        self.validate()?;
        let builder = LoggerBuilder::new()
            .level(self.level)
            .development(self.development)
            .encoding(self.encoding)
            .encoder_config(self.encoder.clone())
            .add_caller(self.add_caller)
            .stacktrace_level(self.stacktrace_level);

        Ok(match &self.output {
            OutputTarget::Stderr => builder.sink(StderrSink::new()),
            OutputTarget::Stdout => builder.sink(StdoutSink::new()),
            OutputTarget::File(path) => builder.sink(FileSink::new(path)?),
        })
    }

    pub fn build(&self) -> Result<Logger> {
        Ok(self.builder()?.build())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::production()
    }
}
