//! Shared types for process supervision.

use std::sync::Arc;
use std::time::Duration;

use anre_core::settings::LauncherSettings;
use serde::Serialize;
use tokio::sync::oneshot;

use super::output::OutputPipeline;
use super::shutdown::DEFAULT_GRACE_PERIOD;

/// Lifecycle state of the supervisor.
///
/// `Idle → Starting → Started | Failed`; a process exit returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupervisorState {
    Idle,
    Starting,
    Started,
    Failed,
}

/// Snapshot of the supervisor for status displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorStatus {
    pub state: SupervisorState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Timing knobs of the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// A silent server counts as started once this window elapses.
    pub startup_window: Duration,
    /// Delay between liveness probes.
    pub health_interval: Duration,
    /// Probe attempt bound, `None` for unbounded.
    pub health_max_attempts: Option<u32>,
    /// Time between SIGTERM and SIGKILL.
    pub grace_period: Duration,
}

impl SupervisorConfig {
    pub fn from_settings(settings: &LauncherSettings) -> Self {
        Self {
            startup_window: settings.startup_window(),
            health_interval: settings.health_interval(),
            health_max_attempts: settings.health_max_attempts,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self::from_settings(&LauncherSettings::with_defaults())
    }
}

/// The one running server process.
///
/// Owned by the supervisor's state; the `Child` itself lives in the exit
/// watcher task, which is reached through `stop_tx`.
pub(crate) struct ServerProcessHandle {
    pub pid: u32,
    /// Distinguishes this process from later ones so a late exit
    /// notification never clears a newer handle.
    pub generation: u64,
    pub output: Arc<OutputPipeline>,
    pub stop_tx: Option<oneshot::Sender<()>>,
    pub exit_rx: Option<oneshot::Receiver<()>>,
}

impl ServerProcessHandle {
    /// Ask the exit watcher to terminate the process.
    pub fn request_stop(&mut self) {
        self.output.cancel_health();
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}
