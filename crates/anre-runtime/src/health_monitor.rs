//! Readiness polling for a freshly announced server port.
//!
//! The monitor probes the port on a fixed interval until the server answers,
//! then stops for good. Individual probe failures are expected while the
//! server warms up and are only logged at debug level. An optional attempt
//! bound turns an endless wait into a reported error.

use std::sync::Arc;
use std::time::Duration;

use anre_core::events::{HealthStatus, ShellEvent};
use anre_core::ports::{LivenessProbe, ProbeOutcome, ShellEventEmitter};
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a monitoring run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    /// The probe succeeded after `attempts` tries.
    Running { attempts: u32 },
    /// The attempt bound was exhausted.
    GaveUp { attempts: u32 },
    /// Monitoring was cancelled (process exited or was stopped).
    Cancelled { attempts: u32 },
}

/// Polls one port until it answers the liveness probe.
pub struct HealthMonitor {
    probe: Arc<dyn LivenessProbe>,
    port: u16,
    interval: Duration,
    max_attempts: Option<u32>,
    cancel_token: CancellationToken,
}

impl HealthMonitor {
    /// Create a new health monitor.
    ///
    /// # Arguments
    ///
    /// * `probe` - Single-shot liveness check
    /// * `port` - Port announced by the server
    /// * `check_interval` - Delay between probes
    /// * `cancel_token` - Token to stop monitoring early
    pub fn new(
        probe: Arc<dyn LivenessProbe>,
        port: u16,
        check_interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            probe,
            port,
            interval: check_interval,
            max_attempts: None,
            cancel_token,
        }
    }

    /// Give up after `max_attempts` probes. `None` polls forever.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Probe until the server answers, the bound is hit, or the token fires.
    ///
    /// Emits `starting` before the first probe and `running` or `error` at
    /// the end. Cancellation emits nothing.
    pub async fn run(self, emitter: Arc<dyn ShellEventEmitter>) -> HealthOutcome {
        let port = self.port;
        emitter.emit(ShellEvent::health_changed(HealthStatus::Starting, Some(port)));
        debug!(port = %port, interval_ms = %self.interval.as_millis(), "Starting health monitor");

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempts: u32 = 0;

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    debug!(port = %port, attempts, "Health monitor cancelled");
                    return HealthOutcome::Cancelled { attempts };
                }
                _ = ticker.tick() => {}
            }

            attempts += 1;
            let outcome = tokio::select! {
                () = self.cancel_token.cancelled() => {
                    debug!(port = %port, attempts, "Health monitor cancelled mid-probe");
                    return HealthOutcome::Cancelled { attempts };
                }
                outcome = self.probe.probe(port) => outcome,
            };

            match outcome {
                ProbeOutcome::Alive => {
                    info!(port = %port, attempts, "Local server is responding");
                    emitter.emit(ShellEvent::health_changed(HealthStatus::Running, Some(port)));
                    return HealthOutcome::Running { attempts };
                }
                ProbeOutcome::NotReady { reason } => {
                    debug!(port = %port, attempts, %reason, "Local server not ready yet");
                }
            }

            if self.max_attempts.is_some_and(|max| attempts >= max) {
                warn!(port = %port, attempts, "Local server did not become ready, giving up");
                emitter.emit(ShellEvent::health_changed(HealthStatus::Error, Some(port)));
                return HealthOutcome::GaveUp { attempts };
            }
        }
    }
}
