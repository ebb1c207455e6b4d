//! Start command handler.
//!
//! Starts the server through the bridge, then follows bridge events on the
//! terminal until the server exits or the user presses Ctrl-C.

use std::time::Duration;

use anre_core::events::{ShellEvent, StartResult};
use anre_runtime::{ShellReply, ShellRequest};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// How long to wait for the server to exit after Ctrl-C.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Render one bridge event for the terminal.
pub fn format_event(event: &ShellEvent) -> Option<String> {
    match event {
        ShellEvent::OutputLine { stream, line } => Some(format!("[{stream}] {line}")),
        ShellEvent::PortDiscovered { port } => Some(format!("Server announced port {port}")),
        ShellEvent::HealthChanged { status, port } => Some(match port {
            Some(port) => format!("Health: {status:?} (port {port})"),
            None => format!("Health: {status:?}"),
        }),
        ShellEvent::ServerExited { pid, code } => Some(match code {
            Some(code) => format!("Server (pid {pid}) exited with code {code}"),
            None => format!("Server (pid {pid}) was terminated"),
        }),
        // Printed from the start reply instead
        ShellEvent::StartResult { .. } => None,
    }
}

fn format_result(result: &StartResult) -> String {
    if result.success {
        result
            .message
            .clone()
            .unwrap_or_else(|| "Local server started".to_string())
    } else {
        format!(
            "Local server failed to start: {}",
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}

pub async fn execute(ctx: &CliContext, json: bool) -> Result<(), CliError> {
    let mut events = ctx.broadcaster.subscribe();

    let reply = ctx.bridge.dispatch(ShellRequest::RequestStart).await?;
    let Some(ShellReply::Start(result)) = reply else {
        return Err(CliError::Core("Unexpected reply to start".to_string()));
    };
    println!("{}", format_result(&result));

    if !result.success && ctx.supervisor().status().await.pid.is_none() {
        return Err(CliError::Process(
            result.error.unwrap_or_else(|| "start failed".to_string()),
        ));
    }

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                info!("Interrupted, stopping local server");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if json {
                        match serde_json::to_string(&event) {
                            Ok(line) => println!("{line}"),
                            Err(e) => warn!(error = %e, "Failed to serialize event"),
                        }
                    } else if let Some(line) = format_event(&event) {
                        println!("{line}");
                    }
                    if matches!(event, ShellEvent::ServerExited { .. }) {
                        return Ok(());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Terminal fell behind, skipped events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    ctx.supervisor().shutdown(SHUTDOWN_TIMEOUT).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anre_core::events::HealthStatus;
    use anre_core::ports::OutputStream;

    #[test]
    fn test_format_output_line() {
        let event = ShellEvent::output_line(OutputStream::Stderr, "boom");
        assert_eq!(format_event(&event).as_deref(), Some("[stderr] boom"));
    }

    #[test]
    fn test_format_health() {
        let event = ShellEvent::health_changed(HealthStatus::Running, Some(51234));
        assert_eq!(
            format_event(&event).as_deref(),
            Some("Health: Running (port 51234)")
        );
    }

    #[test]
    fn test_start_result_is_not_echoed() {
        let event = ShellEvent::start_result(StartResult::already_running());
        assert!(format_event(&event).is_none());
    }

    #[test]
    fn test_format_failure() {
        let text = format_result(&StartResult::failed("Server library not found"));
        assert_eq!(text, "Local server failed to start: Server library not found");
    }
}
