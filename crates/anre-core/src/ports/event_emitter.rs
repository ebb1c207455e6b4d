//! Event emitter trait for the notification bridge.
//!
//! This module defines the abstraction for emitting shell events.
//! Implementations handle transport details (broadcast channels, IPC, etc.).

use crate::events::ShellEvent;

/// Trait for emitting shell events towards the UI surface.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and contexts without a UI surface
/// - `ShellEventBroadcaster` in `anre-runtime` - tokio broadcast channel
pub trait ShellEventEmitter: Send + Sync {
    /// Emit an event.
    ///
    /// Must not block. Events with no listener are dropped.
    fn emit(&self, event: ShellEvent);
}

/// A no-op event emitter for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    pub const fn new() -> Self {
        Self
    }
}

impl ShellEventEmitter for NoopEmitter {
    fn emit(&self, _event: ShellEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_noop_emitter() {
        let emitter = NoopEmitter::new();
        emitter.emit(ShellEvent::port_discovered(9000));
    }

    #[test]
    fn test_arc_emitter() {
        let emitter: Arc<dyn ShellEventEmitter> = Arc::new(NoopEmitter::new());
        emitter.emit(ShellEvent::server_exited(1, Some(0)));
    }
}
