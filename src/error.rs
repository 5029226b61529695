//! Error types for the logging facility

use std::io;
use std::path::PathBuf;

/// Result type for logging operations
pub type Result<T> = std::result::Result<T, LogError>;

/// Errors raised while setting up or writing to log sinks
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log directory could not be created
    #[error("failed to create log directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A hook could not write a formatted line to its sink
    #[error("failed to write to {sink} sink: {source}")]
    WriteFailed {
        /// Name of the sink that failed
        sink: &'static str,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The active log file could not be renamed or reopened
    #[error("failed to rotate log file {}: {source}", path.display())]
    RotationFailed {
        /// Active log file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Configuration file could not be read or parsed
    #[error("invalid logging config {}: {message}", path.display())]
    Config {
        /// Config file path
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// A global tracing subscriber was already installed
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

impl LogError {
    /// Convert into an `io::Error`, keeping this error as the source.
    ///
    /// Used on the `Write` path, where only `io::Error` can be returned.
    pub fn into_io(self) -> io::Error {
        match self {
            LogError::WriteFailed { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
