//! Append-only server log file.
//!
//! Every entry becomes one line `[<RFC 3339 timestamp>] [<TAG>] <message>`.
//! The file is reopened in append mode for each entry so concurrent writers
//! from the stdout and stderr readers never share a handle. Failures go to
//! `tracing` and are otherwise ignored.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anre_core::ports::{LogLevel, ServerLogSinkPort};
use chrono::{SecondsFormat, Utc};
use tracing::warn;

/// File-backed implementation of [`ServerLogSinkPort`].
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_append(&self, line: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

/// Format one log line, including the trailing newline.
pub fn format_entry(level: LogLevel, message: &str) -> String {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    format!("[{timestamp}] [{}] {message}\n", level.tag())
}

impl ServerLogSinkPort for FileLogSink {
    fn append(&self, level: LogLevel, message: &str) {
        let line = format_entry(level, message);
        if let Err(e) = self.try_append(&line) {
            warn!(path = %self.path.display(), error = %e, "Failed to write server log entry");
        }
    }
}
