//! Canonical event union for everything the privileged process tells the UI.
//!
//! This module is the single source of truth for events emitted by the
//! supervisor and consumed by the bridge subscribers.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag for the frontend:
//!
//! ```json
//! { "type": "port_discovered", "port": 51234 }
//! ```

mod server;

use serde::{Deserialize, Serialize};

use crate::contracts::bridge;
use crate::ports::OutputStream;

pub use server::{HealthStatus, ServerPresence, StartResult};

/// Events carried by the notification bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    /// One decoded line of server output.
    OutputLine {
        /// Stream the line was read from.
        stream: OutputStream,
        /// Line content without the trailing newline.
        line: String,
    },

    /// Outcome of a start attempt.
    StartResult {
        /// The result delivered to the requester.
        result: StartResult,
    },

    /// The server announced its listening port.
    PortDiscovered {
        /// Announced port.
        port: u16,
    },

    /// Health monitor status change.
    HealthChanged {
        /// New status.
        status: HealthStatus,
        /// Port being probed, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        port: Option<u16>,
    },

    /// The server process exited.
    ServerExited {
        /// Process id of the exited server.
        pid: u32,
        /// Exit code, `None` when terminated by a signal.
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<i32>,
    },
}

impl ShellEvent {
    /// Create an output line event.
    pub fn output_line(stream: OutputStream, line: impl Into<String>) -> Self {
        Self::OutputLine {
            stream,
            line: line.into(),
        }
    }

    /// Create a start result event.
    pub const fn start_result(result: StartResult) -> Self {
        Self::StartResult { result }
    }

    /// Create a port discovered event.
    pub const fn port_discovered(port: u16) -> Self {
        Self::PortDiscovered { port }
    }

    /// Create a health changed event.
    pub const fn health_changed(status: HealthStatus, port: Option<u16>) -> Self {
        Self::HealthChanged { status, port }
    }

    /// Create a server exited event.
    pub const fn server_exited(pid: u32, code: Option<i32>) -> Self {
        Self::ServerExited { pid, code }
    }

    /// Bridge signal name this event is delivered on.
    pub const fn channel(&self) -> &'static str {
        match self {
            Self::OutputLine { .. } => bridge::OUTPUT_LINE,
            Self::StartResult { .. } => bridge::START_RESULT,
            Self::PortDiscovered { .. } => bridge::PORT_DISCOVERED,
            Self::HealthChanged { .. } => bridge::HEALTH_CHANGED,
            Self::ServerExited { .. } => bridge::SERVER_EXITED,
        }
    }
}
