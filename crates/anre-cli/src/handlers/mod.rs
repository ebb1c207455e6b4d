//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<(), CliError>`
//! - Thin wrappers that call the bridge or the API client and format
//!   the output for the terminal

pub mod check;
pub mod login;
pub mod paths;
pub mod ping;
pub mod start;
