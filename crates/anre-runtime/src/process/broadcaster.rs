//! Notification bridge from the supervisor to the UI surface.
//!
//! A thin wrapper over a tokio broadcast channel. There is no
//! acknowledgement and no backpressure: events sent while nobody listens
//! are dropped, and a subscriber that falls behind loses the oldest events.

use anre_core::events::ShellEvent;
use anre_core::ports::ShellEventEmitter;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcast channel capacity for shell events
const CHANNEL_CAPACITY: usize = 256;

/// Broadcaster for shell events.
#[derive(Debug, Clone)]
pub struct ShellEventBroadcaster {
    sender: broadcast::Sender<ShellEvent>,
}

impl ShellEventBroadcaster {
    /// Create a new broadcaster
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Broadcast an event to all subscribers
    pub fn broadcast(&self, event: ShellEvent) {
        // Only log if there are receivers (avoid spam with no UI attached)
        if self.sender.receiver_count() > 0 {
            trace!(channel = event.channel(), ?event, "Broadcasting shell event");
            let _ = self.sender.send(event);
        }
    }

    /// Subscribe to shell events
    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ShellEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellEventEmitter for ShellEventBroadcaster {
    fn emit(&self, event: ShellEvent) {
        self.broadcast(event);
    }
}
