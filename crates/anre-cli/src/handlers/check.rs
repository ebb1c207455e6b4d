//! Check command handler.

use anre_runtime::{ShellReply, ShellRequest};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Report whether the server library is installed.
pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let reply = ctx.bridge.dispatch(ShellRequest::CheckExists).await?;
    let Some(ShellReply::Presence(presence)) = reply else {
        return Err(CliError::Core("Unexpected reply to check".to_string()));
    };

    if presence.exists {
        println!("Server found: {}", presence.path.display());
        Ok(())
    } else {
        Err(CliError::Missing(
            presence
                .error
                .unwrap_or_else(|| presence.path.display().to_string()),
        ))
    }
}
