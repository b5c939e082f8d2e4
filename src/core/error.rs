//! Error types for the logger facade

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Flushing a sink failed
    #[error("Failed to sync sink '{sink}': {message}")]
    SyncFailed { sink: String, message: String },

    /// Sink no longer accepts writes
    #[error("Sink '{sink}' is closed")]
    SinkClosed { sink: String },

    /// Unknown level name
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// An object or array marshaler reported a failure
    #[error("Failed to marshal field '{key}': {message}")]
    Marshal { key: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a sync failure for the named sink
    pub fn sync_failed(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SyncFailed {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn sink_closed(sink: impl Into<String>) -> Self {
        LoggerError::SinkClosed { sink: sink.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a marshal error for the field with the given key
    pub fn marshal(key: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Marshal {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::sync_failed("stderr", "broken pipe");
        assert!(matches!(err, LoggerError::SyncFailed { .. }));

        let err = LoggerError::config("EncoderConfig", "message key must not be empty");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::sink_closed("file");
        assert!(matches!(err, LoggerError::SinkClosed { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::sync_failed("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "Failed to sync sink '/var/log/app.log': Disk full"
        );

        let err = LoggerError::marshal("user", "missing id");
        assert_eq!(err.to_string(), "Failed to marshal field 'user': missing id");

        let err = LoggerError::InvalidLevel("loud".to_string());
        assert_eq!(err.to_string(), "Invalid log level: 'loud'");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open for append", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open for append"));
    }
}
