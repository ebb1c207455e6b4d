//! Launcher settings types and validation.
//!
//! These are pure domain types with no infrastructure dependencies.
//! Adapters fill them from flags, environment variables or files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Directory the external server ships in, relative to the resource root.
pub const DEFAULT_SERVER_DIR: &str = "server";

/// Entry library handed to the runtime as its only argument.
pub const DEFAULT_SERVER_LIBRARY: &str = "AnreProxy.dll";

/// Runtime program that hosts the library.
pub const DEFAULT_RUNTIME_PROGRAM: &str = "dotnet";

/// Subdirectory of the server directory holding a bundled runtime.
pub const DEFAULT_RUNTIME_DIR: &str = "runtime";

/// Append-only server log, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "anre-server.log";

/// How long a silent server is given before the start counts as successful.
pub const DEFAULT_STARTUP_WINDOW_MS: u64 = 5_000;

/// Interval between liveness probes.
pub const DEFAULT_HEALTH_INTERVAL_MS: u64 = 3_000;

/// Launcher settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherSettings {
    /// Directory containing the external server.
    pub server_dir: Option<String>,

    /// File name of the server entry library inside `server_dir`.
    pub server_library: Option<String>,

    /// Runtime program used to launch the library.
    pub runtime_program: Option<String>,

    /// Subdirectory of `server_dir` checked for a bundled runtime.
    pub runtime_dir: Option<String>,

    /// Path of the persistent server log.
    pub log_file: Option<String>,

    /// Startup window in milliseconds.
    pub startup_window_ms: Option<u64>,

    /// Liveness probe interval in milliseconds.
    pub health_interval_ms: Option<u64>,

    /// Give up probing after this many attempts. `None` polls until the
    /// server answers or goes away.
    pub health_max_attempts: Option<u32>,
}

impl LauncherSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            server_dir: Some(DEFAULT_SERVER_DIR.to_string()),
            server_library: Some(DEFAULT_SERVER_LIBRARY.to_string()),
            runtime_program: Some(DEFAULT_RUNTIME_PROGRAM.to_string()),
            runtime_dir: Some(DEFAULT_RUNTIME_DIR.to_string()),
            log_file: Some(DEFAULT_LOG_FILE.to_string()),
            startup_window_ms: Some(DEFAULT_STARTUP_WINDOW_MS),
            health_interval_ms: Some(DEFAULT_HEALTH_INTERVAL_MS),
            health_max_attempts: None,
        }
    }

    pub fn effective_server_dir(&self) -> &str {
        self.server_dir.as_deref().unwrap_or(DEFAULT_SERVER_DIR)
    }

    pub fn effective_server_library(&self) -> &str {
        self.server_library
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_LIBRARY)
    }

    pub fn effective_runtime_program(&self) -> &str {
        self.runtime_program
            .as_deref()
            .unwrap_or(DEFAULT_RUNTIME_PROGRAM)
    }

    pub fn effective_runtime_dir(&self) -> &str {
        self.runtime_dir.as_deref().unwrap_or(DEFAULT_RUNTIME_DIR)
    }

    pub fn effective_log_file(&self) -> &str {
        self.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)
    }

    /// Get the effective startup window (with default fallback).
    #[must_use]
    pub fn startup_window(&self) -> Duration {
        Duration::from_millis(
            self.startup_window_ms
                .unwrap_or(DEFAULT_STARTUP_WINDOW_MS),
        )
    }

    /// Get the effective probe interval (with default fallback).
    #[must_use]
    pub fn health_interval(&self) -> Duration {
        Duration::from_millis(
            self.health_interval_ms
                .unwrap_or(DEFAULT_HEALTH_INTERVAL_MS),
        )
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref dir) = other.server_dir {
            self.server_dir.clone_from(dir);
        }
        if let Some(ref library) = other.server_library {
            self.server_library.clone_from(library);
        }
        if let Some(ref program) = other.runtime_program {
            self.runtime_program.clone_from(program);
        }
        if let Some(ref dir) = other.runtime_dir {
            self.runtime_dir.clone_from(dir);
        }
        if let Some(ref file) = other.log_file {
            self.log_file.clone_from(file);
        }
        if let Some(window) = other.startup_window_ms {
            self.startup_window_ms = window;
        }
        if let Some(interval) = other.health_interval_ms {
            self.health_interval_ms = interval;
        }
        if let Some(attempts) = other.health_max_attempts {
            self.health_max_attempts = attempts;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub server_dir: Option<Option<String>>,
    pub server_library: Option<Option<String>>,
    pub runtime_program: Option<Option<String>>,
    pub runtime_dir: Option<Option<String>>,
    pub log_file: Option<Option<String>>,
    pub startup_window_ms: Option<Option<u64>>,
    pub health_interval_ms: Option<Option<u64>>,
    pub health_max_attempts: Option<Option<u32>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("Startup window must be between 100ms and 10 minutes, got {0}ms")]
    InvalidStartupWindow(u64),

    #[error("Health interval must be at least 100ms, got {0}ms")]
    InvalidHealthInterval(u64),

    #[error("Health attempt limit must be at least 1")]
    InvalidHealthAttempts,
}

/// Validate settings values.
pub fn validate_settings(settings: &LauncherSettings) -> Result<(), SettingsError> {
    let text_fields = [
        ("Server directory", &settings.server_dir),
        ("Server library", &settings.server_library),
        ("Runtime program", &settings.runtime_program),
        ("Log file", &settings.log_file),
    ];
    for (name, value) in text_fields {
        if value.as_ref().is_some_and(|v| v.trim().is_empty()) {
            return Err(SettingsError::Empty(name));
        }
    }

    if let Some(window) = settings.startup_window_ms {
        if !(100..=600_000).contains(&window) {
            return Err(SettingsError::InvalidStartupWindow(window));
        }
    }

    if let Some(interval) = settings.health_interval_ms {
        if interval < 100 {
            return Err(SettingsError::InvalidHealthInterval(interval));
        }
    }

    if settings.health_max_attempts == Some(0) {
        return Err(SettingsError::InvalidHealthAttempts);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LauncherSettings::with_defaults();
        assert_eq!(settings.effective_server_library(), DEFAULT_SERVER_LIBRARY);
        assert_eq!(settings.startup_window(), Duration::from_secs(5));
        assert_eq!(settings.health_interval(), Duration::from_secs(3));
        assert_eq!(settings.health_max_attempts, None);
    }

    #[test]
    fn test_validate_settings_valid() {
        assert!(validate_settings(&LauncherSettings::with_defaults()).is_ok());
        assert!(validate_settings(&LauncherSettings::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_library() {
        let settings = LauncherSettings {
            server_library: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::Empty("Server library"))
        ));
    }

    #[test]
    fn test_validate_startup_window_too_small() {
        let settings = LauncherSettings {
            startup_window_ms: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidStartupWindow(10))
        ));
    }

    #[test]
    fn test_validate_zero_attempts() {
        let settings = LauncherSettings {
            health_max_attempts: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidHealthAttempts)
        ));
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = LauncherSettings::with_defaults();
        let update = SettingsUpdate {
            runtime_program: Some(Some("mono".to_string())),
            health_max_attempts: Some(Some(20)),
            startup_window_ms: Some(None),
            ..Default::default()
        };
        settings.merge(&update);

        assert_eq!(settings.effective_runtime_program(), "mono");
        assert_eq!(settings.health_max_attempts, Some(20));
        // Cleared field falls back to the default
        assert_eq!(settings.startup_window(), Duration::from_secs(5));
        assert_eq!(settings.effective_server_dir(), DEFAULT_SERVER_DIR);
    }
}
