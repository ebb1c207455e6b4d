//! The local server supervisor.
//!
//! Owns the single external server process: idempotent start, output
//! monitoring, start outcome detection, exit handling and termination.
//! There is no automatic restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anre_core::events::{ServerPresence, ShellEvent, StartResult};
use anre_core::paths::ServerPaths;
use anre_core::ports::{
    LivenessProbe, LogLevel, OutputStream, ServerLogSinkPort, ShellEventEmitter,
};
use tokio::process::Child;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, error, info, warn};

use super::launch::{resolve_launch_plan, spawn};
use super::outcome::StartSignal;
use super::output::{HealthPlan, OutputPipeline};
use super::shutdown::shutdown_child;
use super::stream::{OutputObserver, spawn_stream_reader};
use super::types::{ServerProcessHandle, SupervisorConfig, SupervisorState, SupervisorStatus};

/// How long the exit watcher waits for readers to drain after an exit.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

struct State {
    state: SupervisorState,
    handle: Option<ServerProcessHandle>,
    next_generation: u64,
}

struct Inner {
    paths: ServerPaths,
    config: SupervisorConfig,
    emitter: Arc<dyn ShellEventEmitter>,
    log_sink: Arc<dyn ServerLogSinkPort>,
    probe: Arc<dyn LivenessProbe>,
    state: Mutex<State>,
    spawn_count: AtomicU64,
}

impl Inner {
    fn log(&self, level: LogLevel, message: &str) {
        self.log_sink.append(level, message);
    }

    fn report(&self, result: StartResult) -> StartResult {
        self.emitter.emit(ShellEvent::start_result(result.clone()));
        result
    }
}

/// Supervisor for the external local server.
///
/// Cheap to clone; clones share the same process.
#[derive(Clone)]
pub struct ProcessSupervisor {
    inner: Arc<Inner>,
}

impl ProcessSupervisor {
    /// Create a supervisor.
    ///
    /// # Arguments
    ///
    /// * `paths` - Resolved server locations
    /// * `config` - Startup window, health polling and grace period
    /// * `emitter` - Notification bridge sink
    /// * `log_sink` - Persistent server log
    /// * `probe` - Liveness probe used once a port is announced
    pub fn new(
        paths: ServerPaths,
        config: SupervisorConfig,
        emitter: Arc<dyn ShellEventEmitter>,
        log_sink: Arc<dyn ServerLogSinkPort>,
        probe: Arc<dyn LivenessProbe>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                paths,
                config,
                emitter,
                log_sink,
                probe,
                state: Mutex::new(State {
                    state: SupervisorState::Idle,
                    handle: None,
                    next_generation: 0,
                }),
                spawn_count: AtomicU64::new(0),
            }),
        }
    }

    pub fn paths(&self) -> &ServerPaths {
        &self.inner.paths
    }

    /// Number of processes spawned over the supervisor's lifetime.
    pub fn spawn_count(&self) -> u64 {
        self.inner.spawn_count.load(Ordering::SeqCst)
    }

    /// Report whether the server library is on disk.
    pub fn check_exists(&self) -> ServerPresence {
        let path = self.inner.paths.library.clone();
        let exists = path.is_file();
        let error = (!exists).then(|| format!("Server library not found at: {}", path.display()));
        debug!(path = %path.display(), exists, "Checked for local server");
        ServerPresence {
            exists,
            path,
            error,
        }
    }

    /// Start the server, or report success if it already runs.
    ///
    /// Resolves once the first output chunk arrives, the process dies, or
    /// the startup window passes in silence. The result is also broadcast.
    pub async fn start(&self) -> StartResult {
        let inner = &self.inner;

        let (signal, rx, generation) = {
            let mut guard = inner.state.lock().await;

            if let Some(handle) = guard.handle.as_ref() {
                debug!(pid = %handle.pid, "Start requested while the server is running");
                return inner.report(StartResult::already_running());
            }

            guard.state = SupervisorState::Starting;
            inner.log(LogLevel::Info, "Starting local server");

            let plan = match resolve_launch_plan(&inner.paths) {
                Ok(plan) => plan,
                Err(e) => {
                    guard.state = SupervisorState::Failed;
                    error!(error = %e, "Cannot start local server");
                    inner.log(LogLevel::Error, &e.to_string());
                    return inner.report(StartResult::failed(e.to_string()));
                }
            };

            info!(
                runtime = %plan.runtime.display(),
                library = %plan.library.display(),
                cwd = %plan.working_dir.display(),
                "Spawning local server"
            );

            let mut child = match spawn(&plan) {
                Ok(child) => child,
                Err(e) => {
                    guard.state = SupervisorState::Failed;
                    error!(error = %e, "Local server process error");
                    inner.log(LogLevel::Error, &format!("Process error: {e}"));
                    return inner.report(StartResult::failed(e.to_string()));
                }
            };
            inner.spawn_count.fetch_add(1, Ordering::SeqCst);

            let pid = child.id().unwrap_or_default();
            let generation = guard.next_generation;
            guard.next_generation += 1;
            inner.log(LogLevel::Info, &format!("Local server spawned with pid {pid}"));

            let (signal, rx) = StartSignal::new();
            let output = Arc::new(OutputPipeline::new(
                pid,
                Arc::clone(&signal),
                Arc::clone(&inner.emitter),
                Arc::clone(&inner.log_sink),
                HealthPlan {
                    probe: Arc::clone(&inner.probe),
                    interval: inner.config.health_interval,
                    max_attempts: inner.config.health_max_attempts,
                },
            ));

            let observer: Arc<dyn OutputObserver> = output.clone();
            let mut readers = Vec::with_capacity(2);
            if let Some(stdout) = child.stdout.take() {
                readers.push(spawn_stream_reader(
                    stdout,
                    OutputStream::Stdout,
                    pid,
                    Arc::clone(&observer),
                ));
            }
            if let Some(stderr) = child.stderr.take() {
                readers.push(spawn_stream_reader(
                    stderr,
                    OutputStream::Stderr,
                    pid,
                    Arc::clone(&observer),
                ));
            }

            let (stop_tx, stop_rx) = oneshot::channel();
            let (exit_tx, exit_rx) = oneshot::channel();
            guard.handle = Some(ServerProcessHandle {
                pid,
                generation,
                output: Arc::clone(&output),
                stop_tx: Some(stop_tx),
                exit_rx: Some(exit_rx),
            });

            tokio::spawn(watch_process(
                Arc::clone(inner),
                child,
                ExitWatch {
                    pid,
                    generation,
                    output,
                    readers,
                    stop_rx,
                    exit_tx,
                },
            ));

            (signal, rx, generation)
        };

        let result = signal.wait(rx, inner.config.startup_window).await;

        {
            let mut guard = inner.state.lock().await;
            if guard
                .handle
                .as_ref()
                .is_some_and(|h| h.generation == generation)
            {
                guard.state = if result.success {
                    SupervisorState::Started
                } else {
                    SupervisorState::Failed
                };
            }
        }

        if result.success {
            info!("Local server started");
            inner.log(LogLevel::Info, "Local server started");
        } else {
            let reason = result.error.as_deref().unwrap_or("unknown error");
            warn!(error = %reason, "Local server failed to start");
            inner.log(LogLevel::Error, &format!("Local server failed to start: {reason}"));
        }

        inner.report(result)
    }

    /// Ask the server to terminate. Does not wait for the exit.
    ///
    /// Returns `false` when no server was running.
    pub async fn stop(&self) -> bool {
        let handle = {
            let mut guard = self.inner.state.lock().await;
            guard.state = SupervisorState::Idle;
            guard.handle.take()
        };

        match handle {
            Some(mut handle) => {
                info!(pid = %handle.pid, "Stopping local server");
                self.inner.log(LogLevel::Info, "Stopping local server");
                handle.request_stop();
                true
            }
            None => false,
        }
    }

    /// Terminate the server and wait up to `timeout` for it to exit.
    pub async fn shutdown(&self, timeout: Duration) {
        let handle = {
            let mut guard = self.inner.state.lock().await;
            guard.state = SupervisorState::Idle;
            guard.handle.take()
        };

        let Some(mut handle) = handle else {
            return;
        };

        info!(pid = %handle.pid, "Shutting down local server");
        self.inner.log(LogLevel::Info, "Shutting down local server");
        handle.request_stop();

        if let Some(exit_rx) = handle.exit_rx.take() {
            if tokio::time::timeout(timeout, exit_rx).await.is_err() {
                warn!(pid = %handle.pid, "Local server did not exit in time");
            }
        }
    }

    /// Current state, pid and announced port.
    pub async fn status(&self) -> SupervisorStatus {
        let guard = self.inner.state.lock().await;
        SupervisorStatus {
            state: guard.state,
            pid: guard.handle.as_ref().map(|h| h.pid),
            port: guard.handle.as_ref().and_then(|h| h.output.port()),
        }
    }
}

struct ExitWatch {
    pid: u32,
    generation: u64,
    output: Arc<OutputPipeline>,
    readers: Vec<tokio::task::JoinHandle<()>>,
    stop_rx: oneshot::Receiver<()>,
    exit_tx: oneshot::Sender<()>,
}

/// Own the child until it exits, either on its own or on request.
async fn watch_process(inner: Arc<Inner>, mut child: Child, watch: ExitWatch) {
    let ExitWatch {
        pid,
        generation,
        output,
        readers,
        stop_rx,
        exit_tx,
    } = watch;

    let status = tokio::select! {
        status = child.wait() => status,
        _ = stop_rx => {
            debug!(pid = %pid, "Termination requested");
            shutdown_child(&mut child, inner.config.grace_period).await
        }
    };

    output.cancel_health();

    // Let the readers deliver whatever the process wrote before exiting.
    for reader in readers {
        if tokio::time::timeout(READER_DRAIN_TIMEOUT, reader).await.is_err() {
            debug!(pid = %pid, "Output reader still open after exit");
        }
    }

    // Free the slot before the exit is announced.
    {
        let mut guard = inner.state.lock().await;
        if guard
            .handle
            .as_ref()
            .is_some_and(|h| h.generation == generation)
        {
            guard.handle = None;
            guard.state = SupervisorState::Idle;
        }
    }

    match &status {
        Ok(status) => {
            info!(pid = %pid, %status, "Local server exited");
            inner.log(LogLevel::Info, &format!("Local server exited ({status})"));
            output
                .start_signal()
                .fulfill(StartResult::failed(format!(
                    "Local server exited before reporting ({status})"
                )));
            inner
                .emitter
                .emit(ShellEvent::server_exited(pid, status.code()));
        }
        Err(e) => {
            error!(pid = %pid, error = %e, "Local server process error");
            inner.log(LogLevel::Error, &format!("Process error: {e}"));
            output
                .start_signal()
                .fulfill(StartResult::failed(format!("Process error: {e}")));
            inner.emitter.emit(ShellEvent::server_exited(pid, None));
        }
    }

    let _ = exit_tx.send(());
}
