//! Process supervision and OS-level adapters for the Anre launcher.
//!
//! Implements the ports defined in `anre-core`: the supervisor for the
//! external local server, the notification bridge, the file log sink, the
//! HTTP liveness probe and the proxy API client.
#![deny(unsafe_code)]

pub mod api;
pub mod bridge;
pub mod decode;
mod health;
pub mod health_monitor;
pub mod log_file;
pub mod port_scan;
pub mod process;

// Re-export health utilities for direct use if needed
pub use health::{HttpPingProbe, check_ping, is_pong};

pub use health_monitor::{HealthMonitor, HealthOutcome};

pub use api::{ApiError, ProxyApiClient};
pub use bridge::{BridgeError, ShellBridge, ShellReply, ShellRequest};
pub use decode::decode_output;
pub use log_file::FileLogSink;
pub use port_scan::extract_port;
pub use process::{
    LaunchError, ProcessSupervisor, ShellEventBroadcaster, SupervisorConfig, SupervisorState,
    SupervisorStatus,
};
