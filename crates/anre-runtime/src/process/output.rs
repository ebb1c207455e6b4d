//! Per-process output handling.
//!
//! One [`OutputPipeline`] exists per spawned server. It decides the start
//! outcome from the first chunk, writes every line to the log sink and the
//! bridge, and reacts to the first port announcement by starting the
//! health monitor.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anre_core::events::{ShellEvent, StartResult};
use anre_core::ports::{LivenessProbe, OutputStream, ServerLogSinkPort, ShellEventEmitter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::outcome::StartSignal;
use super::stream::OutputObserver;
use crate::health_monitor::HealthMonitor;
use crate::port_scan::extract_port;

/// Health monitoring parameters for one process.
#[derive(Clone)]
pub struct HealthPlan {
    pub probe: Arc<dyn LivenessProbe>,
    pub interval: Duration,
    pub max_attempts: Option<u32>,
}

pub struct OutputPipeline {
    pid: u32,
    start_signal: Arc<StartSignal>,
    emitter: Arc<dyn ShellEventEmitter>,
    log_sink: Arc<dyn ServerLogSinkPort>,
    health: HealthPlan,
    health_cancel: CancellationToken,
    port: OnceLock<u16>,
}

impl OutputPipeline {
    pub fn new(
        pid: u32,
        start_signal: Arc<StartSignal>,
        emitter: Arc<dyn ShellEventEmitter>,
        log_sink: Arc<dyn ServerLogSinkPort>,
        health: HealthPlan,
    ) -> Self {
        Self {
            pid,
            start_signal,
            emitter,
            log_sink,
            health,
            health_cancel: CancellationToken::new(),
            port: OnceLock::new(),
        }
    }

    /// Port announced by this process, if any.
    pub fn port(&self) -> Option<u16> {
        self.port.get().copied()
    }

    pub fn start_signal(&self) -> &Arc<StartSignal> {
        &self.start_signal
    }

    /// Stop the health monitor, if one is running.
    pub fn cancel_health(&self) {
        self.health_cancel.cancel();
    }

    fn announce_port(&self, port: u16) {
        if self.port.set(port).is_err() {
            debug!(pid = %self.pid, port = %port, "Ignoring repeated port announcement");
            return;
        }

        info!(pid = %self.pid, port = %port, "Local server announced its port");
        self.emitter.emit(ShellEvent::port_discovered(port));

        let monitor = HealthMonitor::new(
            Arc::clone(&self.health.probe),
            port,
            self.health.interval,
            self.health_cancel.child_token(),
        )
        .with_max_attempts(self.health.max_attempts);
        let emitter = Arc::clone(&self.emitter);
        tokio::spawn(monitor.run(emitter));
    }
}

fn trim_line_end(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}

impl OutputObserver for OutputPipeline {
    fn on_chunk(&self, stream: OutputStream, text: &str) {
        if !self.start_signal.is_pending() {
            return;
        }
        let text = trim_line_end(text);
        let result = match stream {
            OutputStream::Stdout => StartResult::started(text),
            OutputStream::Stderr => StartResult::stderr_first(text),
        };
        if self.start_signal.fulfill(result) {
            debug!(pid = %self.pid, stream = %stream, "First output decided the start outcome");
        }
    }

    fn on_line(&self, stream: OutputStream, line: &str) {
        debug!(pid = %self.pid, stream = %stream, "{}", line);
        self.log_sink.append_output(stream, line);
        self.emitter.emit(ShellEvent::output_line(stream, line));

        if let Some(port) = extract_port(line) {
            self.announce_port(port);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anre_core::ports::{NoopLogSink, ProbeOutcome};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct NeverAlive;

    #[async_trait]
    impl LivenessProbe for NeverAlive {
        async fn probe(&self, _port: u16) -> ProbeOutcome {
            ProbeOutcome::not_ready("down")
        }
    }

    #[derive(Clone, Default)]
    struct RecordingEmitter(Arc<Mutex<Vec<ShellEvent>>>);

    impl ShellEventEmitter for RecordingEmitter {
        fn emit(&self, event: ShellEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn pipeline(emitter: &RecordingEmitter) -> (OutputPipeline, tokio::sync::oneshot::Receiver<StartResult>) {
        let (signal, rx) = StartSignal::new();
        let pipeline = OutputPipeline::new(
            42,
            signal,
            Arc::new(emitter.clone()),
            Arc::new(NoopLogSink),
            HealthPlan {
                probe: Arc::new(NeverAlive),
                interval: Duration::from_secs(60),
                max_attempts: None,
            },
        );
        (pipeline, rx)
    }

    #[tokio::test]
    async fn test_stderr_chunk_decides_failure() {
        let emitter = RecordingEmitter::default();
        let (pipeline, rx) = pipeline(&emitter);

        pipeline.on_chunk(OutputStream::Stderr, "fatal: missing config\n");
        pipeline.on_chunk(OutputStream::Stdout, "too late\n");

        let result = rx.await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("fatal: missing config"));
        assert_eq!(result.stderr, "fatal: missing config");
    }

    #[tokio::test]
    async fn test_first_port_wins() {
        let emitter = RecordingEmitter::default();
        let (pipeline, _rx) = pipeline(&emitter);

        pipeline.on_line(OutputStream::Stdout, "Running on port => 51234");
        pipeline.on_line(OutputStream::Stderr, "Running on port => 60000");
        pipeline.cancel_health();

        assert_eq!(pipeline.port(), Some(51234));
        let announced: Vec<u16> = emitter
            .0
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ShellEvent::PortDiscovered { port } => Some(*port),
                _ => None,
            })
            .collect();
        assert_eq!(announced, vec![51234]);
    }

    #[tokio::test]
    async fn test_every_line_is_forwarded() {
        let emitter = RecordingEmitter::default();
        let (pipeline, _rx) = pipeline(&emitter);

        pipeline.on_line(OutputStream::Stdout, "loading");
        pipeline.on_line(OutputStream::Stderr, "warning");

        let events = emitter.0.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                ShellEvent::output_line(OutputStream::Stdout, "loading"),
                ShellEvent::output_line(OutputStream::Stderr, "warning"),
            ]
        );
    }
}
