//! One-shot start outcome raced against the startup window.
//!
//! Stream readers, the exit watcher and the timer all compete to decide a
//! start attempt. Whoever takes the sender first wins; every later attempt
//! is a no-op.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anre_core::events::StartResult;
use tokio::sync::oneshot;

/// Slot holding the sender half until the outcome is decided.
#[derive(Debug)]
pub struct StartSignal {
    sender: Mutex<Option<oneshot::Sender<StartResult>>>,
}

impl StartSignal {
    pub fn new() -> (Arc<Self>, oneshot::Receiver<StartResult>) {
        let (tx, rx) = oneshot::channel();
        let signal = Arc::new(Self {
            sender: Mutex::new(Some(tx)),
        });
        (signal, rx)
    }

    fn take(&self) -> Option<oneshot::Sender<StartResult>> {
        self.sender.lock().ok().and_then(|mut sender| sender.take())
    }

    /// Deliver `result` if nobody decided yet. Returns whether it was delivered.
    pub fn fulfill(&self, result: StartResult) -> bool {
        self.take().is_some_and(|tx| tx.send(result).is_ok())
    }

    /// Whether the outcome is still open.
    pub fn is_pending(&self) -> bool {
        self.sender.lock().is_ok_and(|sender| sender.is_some())
    }

    /// Wait for the outcome, counting silence over `window` as success.
    pub async fn wait(
        &self,
        mut rx: oneshot::Receiver<StartResult>,
        window: Duration,
    ) -> StartResult {
        match tokio::time::timeout(window, &mut rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => StartResult::failed("Start attempt was abandoned"),
            Err(_) => {
                if self.take().is_some() {
                    StartResult::started_silently()
                } else {
                    // Decided between the timer firing and the take above.
                    rx.await
                        .unwrap_or_else(|_| StartResult::failed("Start attempt was abandoned"))
                }
            }
        }
    }
}
