//! Liveness probe port.

use async_trait::async_trait;

/// Result of a single liveness probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with the expected payload.
    Alive,
    /// The server could not be reached or answered something else.
    NotReady {
        /// Why the probe did not succeed.
        reason: String,
    },
}

impl ProbeOutcome {
    pub fn not_ready(reason: impl Into<String>) -> Self {
        Self::NotReady {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }
}

/// A single-shot liveness check against a local port.
///
/// Implementations swallow transport failures and report them as
/// `NotReady`; the caller decides whether to retry.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn probe(&self, port: u16) -> ProbeOutcome;
}
