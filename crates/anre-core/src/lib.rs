//! Core domain types and port definitions for the Anre launcher.
//!
//! This crate knows nothing about processes, files or HTTP. It defines the
//! events the supervisor emits, the ports adapters implement, the settings
//! model and path resolution.
#![deny(unsafe_code)]

pub mod contracts;
pub mod events;
pub mod paths;
pub mod ports;
pub mod settings;

pub use events::{HealthStatus, ServerPresence, ShellEvent, StartResult};
pub use paths::{PathError, ServerPaths, resource_root};
pub use ports::{
    CoreError, LivenessProbe, LogLevel, NoopEmitter, NoopLogSink, OutputStream, ProbeOutcome,
    ProcessError, ServerLogSinkPort, ShellEventEmitter, WindowControl,
};
pub use settings::{LauncherSettings, SettingsError, SettingsUpdate, validate_settings};
