//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No process, filesystem or HTTP implementation details
//! - Event and log sinks are fire-and-forget (no `Result`)
//! - Window control is best-effort: no focused window means a no-op

pub mod event_emitter;
pub mod liveness;
pub mod server_log_sink;
pub mod window;

use thiserror::Error;

pub use event_emitter::{NoopEmitter, ShellEventEmitter};
pub use liveness::{LivenessProbe, ProbeOutcome};
pub use server_log_sink::{LogLevel, NoopLogSink, OutputStream, ServerLogSinkPort};
pub use window::WindowControl;

/// Domain-specific errors for process supervisor operations.
///
/// This error type abstracts away process management implementation details
/// and provides a clean interface for adapters to handle process failures.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A required server artifact is missing on disk.
    #[error("Missing artifact: {0}")]
    MissingArtifact(String),

    /// Failed to start the process.
    #[error("Failed to start: {0}")]
    StartFailed(String),

    /// Failed to stop the process.
    #[error("Failed to stop: {0}")]
    StopFailed(String),

    /// The process is not running.
    #[error("Process not running")]
    NotRunning,

    /// Health check failed.
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters should map this to their own error types (CLI exit codes,
/// bridge replies).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Process operation failed.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Path resolution error.
    #[error(transparent)]
    Path(#[from] crate::paths::PathError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}
