//! CLI-specific error types and mappings.
//!
//! Maps `LogError` onto process exit codes and user-facing messages.

use notelog_core::{LogError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Log writer or editor session failure.
    #[error(transparent)]
    Log(#[from] LogError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    /// Reading messages from the event source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where a category fits.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Log(err) => match err {
                LogError::Io { .. } => 74, // EX_IOERR
                LogError::ProcessLaunch(_) | LogError::Process(_) => 71, // EX_OSERR
                LogError::Disposed => 70, // EX_SOFTWARE
                LogError::LaunchTimeout(_) | LogError::CloseTimeout(_) => 75, // EX_TEMPFAIL
                LogError::Input(_) => 69, // EX_UNAVAILABLE
                LogError::Settings(_) => 78, // EX_CONFIG
            },
            Self::Config(_) => 78, // EX_CONFIG
            Self::Io(_) => 74, // EX_IOERR
        }
    }
}
