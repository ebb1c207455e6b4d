//! Ping command handler.

use anre_runtime::ProxyApiClient;

use crate::error::CliError;

pub async fn execute(port: u16) -> Result<(), CliError> {
    let client = ProxyApiClient::new(port)?;
    if client.ping().await? {
        println!("Pong from {}", client.base_url());
        Ok(())
    } else {
        Err(CliError::Request(format!(
            "{} answered without Pong",
            client.base_url()
        )))
    }
}
