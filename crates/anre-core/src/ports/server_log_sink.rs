//! Server log sink port for persistent log capture.
//!
//! This port abstracts the destination for supervisor diagnostics and
//! server output lines, allowing a file-backed sink in the application and
//! a no-op sink in tests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard stream a chunk of server output was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tag written in front of every log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Stdout,
    Stderr,
}

impl LogLevel {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Stdout => "STDOUT",
            Self::Stderr => "STDERR",
        }
    }
}

impl From<OutputStream> for LogLevel {
    fn from(stream: OutputStream) -> Self {
        match stream {
            OutputStream::Stdout => Self::Stdout,
            OutputStream::Stderr => Self::Stderr,
        }
    }
}

/// Port for appending log entries to a sink.
///
/// Implementations must be thread-safe and must never propagate failures
/// to the caller.
pub trait ServerLogSinkPort: Send + Sync {
    /// Append one entry.
    fn append(&self, level: LogLevel, message: &str);

    /// Append one line of server output.
    fn append_output(&self, stream: OutputStream, line: &str) {
        self.append(stream.into(), line);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogSink;

impl ServerLogSinkPort for NoopLogSink {
    fn append(&self, _level: LogLevel, _message: &str) {}
}
