//! Window control for a terminal session.
//!
//! A terminal has no window to minimize or close, so those signals are
//! logged and dropped. External links are handed to the platform opener.

use std::process::{Command, Stdio};

use anre_core::ports::{CoreError, WindowControl};
use tracing::{debug, info};

/// [`WindowControl`] without a focused window.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessWindow;

impl HeadlessWindow {
    pub const fn new() -> Self {
        Self
    }
}

fn opener_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }

    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

impl WindowControl for HeadlessWindow {
    fn minimize(&self) {
        debug!("No focused window, ignoring minimize");
    }

    fn toggle_maximize(&self) {
        debug!("No focused window, ignoring maximize");
    }

    fn close(&self) {
        debug!("No focused window, ignoring close");
    }

    fn open_external(&self, url: &str) -> Result<(), CoreError> {
        info!(url = %url, "Opening link in browser");
        opener_command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
            .map_err(|e| CoreError::ExternalService(format!("Failed to open {url}: {e}")))
    }
}
