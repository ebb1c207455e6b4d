//! CLI-specific error types and mappings.
//!
//! Maps domain and adapter errors to exit codes and user-facing messages.

use anre_core::CoreError;
use anre_runtime::{ApiError, BridgeError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core domain error.
    #[error("{0}")]
    Core(String),

    /// Invalid input.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server files are missing.
    #[error("Server not found: {0}")]
    Missing(String),

    /// Process execution error.
    #[error("Process error: {0}")]
    Process(String),

    /// The local server could not be reached or answered badly.
    #[error("Server request failed: {0}")]
    Request(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Missing(_) => 66,  // EX_NOINPUT
            Self::Request(_) => 69,  // EX_UNAVAILABLE
            Self::Process(_) => 71,  // EX_OSERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Process(proc_err) => Self::Process(proc_err.to_string()),
            CoreError::Settings(settings_err) => Self::Config(settings_err.to_string()),
            CoreError::Path(path_err) => Self::Config(path_err.to_string()),
            CoreError::Validation(msg) => Self::Arguments(msg),
            CoreError::ExternalService(msg) => Self::Core(format!("External service: {msg}")),
            CoreError::Internal(msg) => Self::Core(msg),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<BridgeError> for CliError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Window(core) => core.into(),
            other => Self::Arguments(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anre_core::ProcessError;
    use anre_core::settings::SettingsError;

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let err: CliError = CoreError::Process(ProcessError::NotRunning).into();
        assert_eq!(err.exit_code(), 71);

        let err: CliError = CoreError::Settings(SettingsError::InvalidHealthAttempts).into();
        assert_eq!(err.exit_code(), 78);

        let err: CliError = BridgeError::RejectedUrl("file:///x".to_string()).into();
        assert_eq!(err.exit_code(), 2);
    }
}
