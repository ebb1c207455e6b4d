//! Local server process management.
//!
//! - [`ProcessSupervisor`]: start/stop/status of the one server process
//! - [`ShellEventBroadcaster`]: notification bridge to the UI surface
//! - [`launch`]: launch plan resolution and spawning
//! - [`shutdown`]: graceful termination with a kill fallback

mod broadcaster;
pub mod launch;
mod outcome;
mod output;
pub mod shutdown;
mod stream;
mod supervisor;
mod types;

pub use broadcaster::ShellEventBroadcaster;
pub use launch::{LaunchError, LaunchPlan, RuntimeSource};
pub use supervisor::ProcessSupervisor;
pub use types::{SupervisorConfig, SupervisorState, SupervisorStatus};
