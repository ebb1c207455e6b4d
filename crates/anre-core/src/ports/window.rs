//! Window control port.
//!
//! The privileged process forwards window signals to whichever window is
//! focused. Implementations decide what "focused" means; when there is no
//! window every call is a no-op.

use super::CoreError;

/// Operations the UI surface may request on its own window.
pub trait WindowControl: Send + Sync {
    /// Minimize the focused window.
    fn minimize(&self);

    /// Maximize the focused window, or restore it when already maximized.
    fn toggle_maximize(&self);

    /// Close the focused window.
    fn close(&self);

    /// Open a link in the user's browser.
    fn open_external(&self, url: &str) -> Result<(), CoreError>;
}
