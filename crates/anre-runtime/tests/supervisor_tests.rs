//! Supervisor tests against a fake server.
//!
//! The "library" is a shell script and the runtime is `sh` from `PATH`, so
//! `<runtime> <library>` runs the script exactly like the real server.
#![cfg(unix)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use anre_core::events::{HealthStatus, ShellEvent};
use anre_core::paths::ServerPaths;
use anre_core::ports::{LivenessProbe, NoopLogSink, OutputStream, ProbeOutcome, ServerLogSinkPort};
use anre_core::settings::LauncherSettings;
use anre_runtime::{
    FileLogSink, ProcessSupervisor, ShellEventBroadcaster, SupervisorConfig, SupervisorState,
    extract_port,
};
use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::broadcast::{self, error::RecvError};

const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct AlwaysAlive {
    probes: AtomicU32,
}

#[async_trait]
impl LivenessProbe for AlwaysAlive {
    async fn probe(&self, _port: u16) -> ProbeOutcome {
        self.probes.fetch_add(1, Ordering::SeqCst);
        ProbeOutcome::Alive
    }
}

struct Fixture {
    dir: TempDir,
    broadcaster: ShellEventBroadcaster,
    probe: Arc<AlwaysAlive>,
}

impl Fixture {
    fn new(script: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        if let Some(script) = script {
            std::fs::write(dir.path().join("server.sh"), script).unwrap();
        }
        Self {
            dir,
            broadcaster: ShellEventBroadcaster::new(),
            probe: Arc::new(AlwaysAlive::default()),
        }
    }

    fn paths(&self) -> ServerPaths {
        let root = self.dir.path();
        let settings = LauncherSettings {
            server_dir: Some(root.display().to_string()),
            server_library: Some("server.sh".to_string()),
            runtime_program: Some("sh".to_string()),
            ..LauncherSettings::with_defaults()
        };
        ServerPaths::resolve_with_roots(&settings, root, root).unwrap()
    }

    fn supervisor_with(
        &self,
        startup_window: Duration,
        log_sink: Arc<dyn ServerLogSinkPort>,
    ) -> ProcessSupervisor {
        let config = SupervisorConfig {
            startup_window,
            health_interval: Duration::from_millis(50),
            health_max_attempts: Some(20),
            grace_period: Duration::from_secs(2),
        };
        ProcessSupervisor::new(
            self.paths(),
            config,
            Arc::new(self.broadcaster.clone()),
            log_sink,
            self.probe.clone(),
        )
    }

    fn supervisor(&self, startup_window: Duration) -> ProcessSupervisor {
        self.supervisor_with(startup_window, Arc::new(NoopLogSink))
    }

    fn spawn_marks(&self) -> usize {
        read_lines(&self.dir.path().join("spawns.txt")).len()
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

async fn wait_for(
    rx: &mut broadcast::Receiver<ShellEvent>,
    pred: impl Fn(&ShellEvent) -> bool,
) -> ShellEvent {
    tokio::time::timeout(EVENT_TIMEOUT, async {
        loop {
            match rx.recv().await {
                Ok(event) if pred(&event) => return event,
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

#[tokio::test]
async fn test_second_start_does_not_spawn_again() {
    let fixture = Fixture::new(Some("echo started >> spawns.txt\necho ready\nexec sleep 30\n"));
    let supervisor = fixture.supervisor(Duration::from_secs(5));

    let first = supervisor.start().await;
    let second = supervisor.start().await;

    assert!(first.success);
    assert_eq!(first.stdout, "ready");
    assert!(second.success);
    assert_eq!(second.message.as_deref(), Some("Local server is already running"));
    assert_eq!(supervisor.spawn_count(), 1);
    assert_eq!(fixture.spawn_marks(), 1);
    assert_eq!(supervisor.status().await.state, SupervisorState::Started);

    supervisor.shutdown(Duration::from_secs(5)).await;
}

#[tokio::test]
async fn test_missing_library_spawns_nothing() {
    let fixture = Fixture::new(None);
    let supervisor = fixture.supervisor(Duration::from_secs(5));

    let result = supervisor.start().await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("server.sh"));
    assert_eq!(supervisor.spawn_count(), 0);
    let status = supervisor.status().await;
    assert_eq!(status.state, SupervisorState::Failed);
    assert_eq!(status.pid, None);
}

#[tokio::test]
async fn test_stderr_first_is_failure() {
    let fixture = Fixture::new(Some("echo 'fatal: config missing' >&2\nexec sleep 30\n"));
    let supervisor = fixture.supervisor(Duration::from_secs(5));

    let result = supervisor.start().await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("fatal: config missing"));
    assert_eq!(result.stderr, "fatal: config missing");
    assert_eq!(supervisor.status().await.state, SupervisorState::Failed);

    supervisor.shutdown(Duration::from_secs(5)).await;
}

#[tokio::test]
async fn test_silent_server_succeeds_after_window() {
    let fixture = Fixture::new(Some("exec sleep 30\n"));
    let window = Duration::from_millis(300);
    let supervisor = fixture.supervisor(window);

    let begin = Instant::now();
    let result = supervisor.start().await;

    assert!(begin.elapsed() >= window);
    assert!(result.success);
    assert!(result.stdout.is_empty());
    assert!(result.stderr.is_empty());

    supervisor.shutdown(Duration::from_secs(5)).await;
}

#[tokio::test]
async fn test_exit_before_output_is_failure() {
    let fixture = Fixture::new(Some("exit 3\n"));
    let supervisor = fixture.supervisor(Duration::from_secs(5));
    let mut rx = fixture.broadcaster.subscribe();

    let result = supervisor.start().await;

    assert!(!result.success);
    assert!(result.error.unwrap().contains("exited"));
    let exited = wait_for(&mut rx, |e| matches!(e, ShellEvent::ServerExited { .. })).await;
    assert!(matches!(exited, ShellEvent::ServerExited { code: Some(3), .. }));
}

#[tokio::test]
async fn test_announced_port_reaches_listener() {
    let fixture = Fixture::new(Some(
        "sleep 0.2\necho 'Running on port => 9000'\nexec sleep 30\n",
    ));
    let log_path = fixture.dir.path().join("logs").join("server.log");
    let supervisor = fixture.supervisor_with(
        Duration::from_secs(5),
        Arc::new(FileLogSink::new(&log_path)),
    );
    let mut rx = fixture.broadcaster.subscribe();

    let result = supervisor.start().await;
    assert!(result.success);

    let line = wait_for(&mut rx, |e| matches!(e, ShellEvent::OutputLine { .. })).await;
    let ShellEvent::OutputLine { stream, line } = line else {
        unreachable!()
    };
    assert_eq!(stream, OutputStream::Stdout);
    assert_eq!(line, "Running on port => 9000");
    assert_eq!(extract_port(&line), Some(9000));

    let port = wait_for(&mut rx, |e| matches!(e, ShellEvent::PortDiscovered { .. })).await;
    assert_eq!(port, ShellEvent::port_discovered(9000));

    let running = wait_for(&mut rx, |e| {
        matches!(e, ShellEvent::HealthChanged { status: HealthStatus::Running, .. })
    })
    .await;
    assert_eq!(running, ShellEvent::health_changed(HealthStatus::Running, Some(9000)));
    assert_eq!(fixture.probe.probes.load(Ordering::SeqCst), 1);
    assert_eq!(supervisor.status().await.port, Some(9000));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("[STDOUT] Running on port => 9000"));

    supervisor.shutdown(Duration::from_secs(5)).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exit_allows_a_fresh_start() {
    let fixture = Fixture::new(Some("echo started >> spawns.txt\necho hello\n"));
    let supervisor = fixture.supervisor(Duration::from_secs(5));
    let mut rx = fixture.broadcaster.subscribe();

    for round in 1..=10_u64 {
        let result = supervisor.start().await;
        assert!(result.success, "round {round}: {result:?}");
        assert_eq!(result.message.as_deref(), Some("Local server started"), "round {round}");

        // Restart straight from the exit notification, as a UI would
        wait_for(&mut rx, |e| matches!(e, ShellEvent::ServerExited { .. })).await;
        let status = supervisor.status().await;
        assert_eq!(status.state, SupervisorState::Idle, "round {round}");
        assert_eq!(status.pid, None, "round {round}");
        assert_eq!(supervisor.spawn_count(), round);
    }

    assert_eq!(fixture.spawn_marks(), 10);
}

#[tokio::test]
async fn test_port_announced_on_stderr_is_detected() {
    let fixture = Fixture::new(Some(
        "echo booting\nsleep 0.2\necho 'Running on port => 9100' >&2\nexec sleep 30\n",
    ));
    let supervisor = fixture.supervisor(Duration::from_secs(5));
    let mut rx = fixture.broadcaster.subscribe();

    let result = supervisor.start().await;
    assert!(result.success);
    assert_eq!(result.stdout, "booting");

    let line = wait_for(&mut rx, |e| {
        matches!(e, ShellEvent::OutputLine { stream: OutputStream::Stderr, .. })
    })
    .await;
    assert_eq!(
        line,
        ShellEvent::output_line(OutputStream::Stderr, "Running on port => 9100")
    );

    let port = wait_for(&mut rx, |e| matches!(e, ShellEvent::PortDiscovered { .. })).await;
    assert_eq!(port, ShellEvent::port_discovered(9100));

    let running = wait_for(&mut rx, |e| {
        matches!(e, ShellEvent::HealthChanged { status: HealthStatus::Running, .. })
    })
    .await;
    assert_eq!(running, ShellEvent::health_changed(HealthStatus::Running, Some(9100)));
    assert_eq!(supervisor.status().await.port, Some(9100));

    supervisor.shutdown(Duration::from_secs(5)).await;
}

#[tokio::test]
async fn test_stop_terminates_the_process() {
    let fixture = Fixture::new(Some("echo ready\nexec sleep 30\n"));
    let supervisor = fixture.supervisor(Duration::from_secs(5));
    let mut rx = fixture.broadcaster.subscribe();

    assert!(supervisor.start().await.success);
    let pid = supervisor.status().await.pid.unwrap();

    assert!(supervisor.stop().await);
    assert!(!supervisor.stop().await);
    assert_eq!(supervisor.status().await.state, SupervisorState::Idle);

    let exited = wait_for(&mut rx, |e| matches!(e, ShellEvent::ServerExited { .. })).await;
    assert!(matches!(exited, ShellEvent::ServerExited { pid: p, .. } if p == pid));
}
