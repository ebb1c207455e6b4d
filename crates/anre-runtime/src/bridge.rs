//! Inbound side of the bridge: signals from the UI surface.
//!
//! The UI may only send the signals listed in
//! [`anre_core::contracts::bridge::INBOUND`]. Each is parsed into a
//! [`ShellRequest`] and dispatched to the supervisor or the window port.
//! Outbound notifications go through [`crate::ShellEventBroadcaster`].

use std::sync::Arc;

use anre_core::contracts::bridge;
use anre_core::events::{HealthStatus, ServerPresence, ShellEvent, StartResult};
use anre_core::ports::{CoreError, ShellEventEmitter, WindowControl};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::process::ProcessSupervisor;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Signal not accepted from the UI: {0}")]
    UnknownSignal(String),

    #[error("Invalid payload for {signal}: {reason}")]
    InvalidPayload { signal: String, reason: String },

    #[error("Refusing to open non-web URL: {0}")]
    RejectedUrl(String),

    #[error(transparent)]
    Window(#[from] CoreError),
}

/// A signal sent by the UI surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellRequest {
    RequestStart,
    CheckExists,
    MinimizeWindow,
    MaximizeWindow,
    CloseWindow,
    OpenExternalUrl { url: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UrlPayload {
    Bare(String),
    Object { url: String },
}

impl ShellRequest {
    /// Parse a signal name and its optional JSON payload.
    pub fn from_signal(signal: &str, payload: Option<Value>) -> Result<Self, BridgeError> {
        let request = match signal {
            bridge::REQUEST_START => Self::RequestStart,
            bridge::CHECK_EXISTS => Self::CheckExists,
            bridge::MINIMIZE_WINDOW => Self::MinimizeWindow,
            bridge::MAXIMIZE_WINDOW => Self::MaximizeWindow,
            bridge::CLOSE_WINDOW => Self::CloseWindow,
            bridge::OPEN_EXTERNAL_URL => {
                let payload = payload.ok_or_else(|| BridgeError::InvalidPayload {
                    signal: signal.to_string(),
                    reason: "missing url".to_string(),
                })?;
                let url = match serde_json::from_value::<UrlPayload>(payload) {
                    Ok(UrlPayload::Bare(url) | UrlPayload::Object { url }) => url,
                    Err(e) => {
                        return Err(BridgeError::InvalidPayload {
                            signal: signal.to_string(),
                            reason: e.to_string(),
                        });
                    }
                };
                Self::OpenExternalUrl { url }
            }
            other => return Err(BridgeError::UnknownSignal(other.to_string())),
        };
        Ok(request)
    }

    /// Wire name of this request.
    pub const fn signal(&self) -> &'static str {
        match self {
            Self::RequestStart => bridge::REQUEST_START,
            Self::CheckExists => bridge::CHECK_EXISTS,
            Self::MinimizeWindow => bridge::MINIMIZE_WINDOW,
            Self::MaximizeWindow => bridge::MAXIMIZE_WINDOW,
            Self::CloseWindow => bridge::CLOSE_WINDOW,
            Self::OpenExternalUrl { .. } => bridge::OPEN_EXTERNAL_URL,
        }
    }
}

/// Reply to a request/response signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ShellReply {
    Start(StartResult),
    Presence(ServerPresence),
}

/// Only web links may leave the application.
pub fn validate_external_url(raw: &str) -> Result<Url, BridgeError> {
    let url = Url::parse(raw).map_err(|_| BridgeError::RejectedUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(BridgeError::RejectedUrl(raw.to_string())),
    }
}

/// Routes UI signals to the supervisor and the window.
#[derive(Clone)]
pub struct ShellBridge {
    supervisor: ProcessSupervisor,
    window: Arc<dyn WindowControl>,
    emitter: Arc<dyn ShellEventEmitter>,
}

impl ShellBridge {
    pub fn new(
        supervisor: ProcessSupervisor,
        window: Arc<dyn WindowControl>,
        emitter: Arc<dyn ShellEventEmitter>,
    ) -> Self {
        Self {
            supervisor,
            window,
            emitter,
        }
    }

    pub const fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }

    /// Parse and dispatch a raw signal.
    pub async fn handle_signal(
        &self,
        signal: &str,
        payload: Option<Value>,
    ) -> Result<Option<ShellReply>, BridgeError> {
        let request = ShellRequest::from_signal(signal, payload).inspect_err(|e| {
            warn!(signal = %signal, error = %e, "Dropping UI signal");
        })?;
        self.dispatch(request).await
    }

    /// Dispatch a parsed request. Fire-and-forget signals reply `None`.
    pub async fn dispatch(&self, request: ShellRequest) -> Result<Option<ShellReply>, BridgeError> {
        debug!(signal = request.signal(), "Handling UI signal");
        match request {
            ShellRequest::RequestStart => Ok(Some(ShellReply::Start(self.supervisor.start().await))),
            ShellRequest::CheckExists => Ok(Some(ShellReply::Presence(self.check_exists()))),
            ShellRequest::MinimizeWindow => {
                self.window.minimize();
                Ok(None)
            }
            ShellRequest::MaximizeWindow => {
                self.window.toggle_maximize();
                Ok(None)
            }
            ShellRequest::CloseWindow => {
                self.window.close();
                Ok(None)
            }
            ShellRequest::OpenExternalUrl { url } => {
                let url = validate_external_url(&url)?;
                self.window.open_external(url.as_str())?;
                Ok(None)
            }
        }
    }

    fn check_exists(&self) -> ServerPresence {
        self.emitter
            .emit(ShellEvent::health_changed(HealthStatus::Checking, None));
        let presence = self.supervisor.check_exists();
        if !presence.exists {
            self.emitter
                .emit(ShellEvent::health_changed(HealthStatus::NotFound, None));
        }
        presence
    }
}
