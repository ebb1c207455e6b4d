//! Liveness probing for the external server.
//!
//! The server answers `GET /Base/Ping` with a small JSON document; any field
//! holding the literal `"Pong"` means it is up. This module is intentionally
//! minimal and has no retry policy; see `health_monitor` for that.

use std::time::Duration;

use anre_core::contracts::http::{PING_PATH, PING_REPLY, local_base_url};
use anre_core::ports::{LivenessProbe, ProbeOutcome};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Per-request timeout for a single probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Whether a ping response body carries the expected reply.
pub fn is_pong(body: &Value) -> bool {
    match body {
        Value::String(s) => s == PING_REPLY,
        Value::Object(map) => map.values().any(is_pong),
        _ => false,
    }
}

/// HTTP implementation of [`LivenessProbe`].
#[derive(Debug, Clone)]
pub struct HttpPingProbe {
    client: Client,
}

impl HttpPingProbe {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(PROBE_TIMEOUT).build()?;
        Ok(Self { client })
    }

    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LivenessProbe for HttpPingProbe {
    async fn probe(&self, port: u16) -> ProbeOutcome {
        let url = format!("{}{}", local_base_url(port), PING_PATH);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(port = %port, error = %e, "Ping request failed");
                return ProbeOutcome::not_ready(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            return ProbeOutcome::not_ready(format!("Ping returned status {status}"));
        }

        match response.json::<Value>().await {
            Ok(body) if is_pong(&body) => ProbeOutcome::Alive,
            Ok(body) => ProbeOutcome::not_ready(format!("Unexpected ping reply: {body}")),
            Err(e) => ProbeOutcome::not_ready(format!("Unreadable ping reply: {e}")),
        }
    }
}

/// Single-shot convenience wrapper around [`HttpPingProbe`].
pub async fn check_ping(port: u16) -> bool {
    match HttpPingProbe::new() {
        Ok(probe) => probe.probe(port).await.is_alive(),
        Err(e) => {
            debug!(error = %e, "Failed to build ping client");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_pong() {
        assert!(is_pong(&json!({ "message": "Pong" })));
        assert!(is_pong(&json!({ "code": 0, "data": { "reply": "Pong" } })));
        assert!(is_pong(&json!("Pong")));
        assert!(!is_pong(&json!({ "message": "pong" })));
        assert!(!is_pong(&json!({ "message": "Ping" })));
        assert!(!is_pong(&json!(["Pong"])));
    }

    #[tokio::test]
    async fn test_unreachable_port_is_not_ready() {
        // Nothing listens on this port
        let probe = HttpPingProbe::new().unwrap();
        let outcome = probe.probe(1).await;
        assert!(matches!(outcome, ProbeOutcome::NotReady { .. }));
        assert!(!check_ping(1).await);
    }

    #[test]
    fn test_check_ping_outside_runtime() {
        assert!(!tokio_test::block_on(check_ping(1)));
    }
}
