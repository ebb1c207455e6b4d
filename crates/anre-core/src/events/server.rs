//! Local server lifecycle payloads.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one start attempt.
///
/// Constructed once per attempt, handed to the requester and broadcast on
/// the bridge. `stdout`/`stderr` carry whatever fragment of output decided
/// the outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl StartResult {
    /// A start request arrived while a server process already exists.
    pub fn already_running() -> Self {
        Self {
            success: true,
            message: Some("Local server is already running".to_string()),
            ..Self::default()
        }
    }

    /// The server wrote to stdout first.
    pub fn started(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some("Local server started".to_string()),
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Nothing arrived within the startup window.
    pub fn started_silently() -> Self {
        Self {
            success: true,
            message: Some("Local server started without output".to_string()),
            ..Self::default()
        }
    }

    /// The server wrote to stderr before anything else.
    pub fn stderr_first(stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        Self {
            success: false,
            error: Some(stderr.clone()),
            stderr,
            ..Self::default()
        }
    }

    /// The attempt failed without any output.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Reply to a check-exists request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPresence {
    pub exists: bool,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health of the local server as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    /// Looking for the server files.
    Checking,
    /// Process is up, waiting for the liveness probe.
    Starting,
    /// Liveness probe answered.
    Running,
    /// Start failed or the probe gave up.
    Error,
    /// Server files are missing.
    NotFound,
}

impl HealthStatus {
    /// Whether the server accepts requests.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}
