//! Error types for the log writer and its editor sessions.
//!
//! Adapters map `LogError` onto their own surfaces (CLI exit codes).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::settings::SettingsError;

/// Canonical error type for log writes.
#[derive(Debug, Error)]
pub enum LogError {
    /// The destination file could not be created or accessed.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The editor process could not be started, or died before becoming ready.
    #[error("Failed to launch editor: {0}")]
    ProcessLaunch(String),

    /// Signalling or waiting on the editor process failed.
    #[error("Editor process error: {0}")]
    Process(String),

    /// A write was attempted after the writer was disposed.
    #[error("Log writer has been disposed")]
    Disposed,

    /// The editor did not become ready for input in time.
    #[error("Editor did not become ready within {0:?}")]
    LaunchTimeout(Duration),

    /// The editor did not exit in time after a close request.
    #[error("Editor did not exit within {0:?} of the close request")]
    CloseTimeout(Duration),

    /// Synthetic keyboard input could not be delivered.
    #[error("Keyboard input failed: {0}")]
    Input(String),

    /// Invalid driver settings.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl LogError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is one of the two timeout kinds.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::LaunchTimeout(_) | Self::CloseTimeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = LogError::io(
            "/nowhere/log.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/nowhere/log.txt"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_timeout_classification() {
        assert!(LogError::LaunchTimeout(Duration::from_secs(1)).is_timeout());
        assert!(LogError::CloseTimeout(Duration::from_secs(1)).is_timeout());
        assert!(!LogError::Disposed.is_timeout());
    }
}
