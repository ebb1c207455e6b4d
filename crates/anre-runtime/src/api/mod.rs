//! HTTP client for the local proxy server's REST API.
//!
//! Response bodies belong to the external server and are returned as raw
//! JSON without interpretation.

mod requests;

use std::time::Duration;

use anre_core::contracts::http::{
    AUTH_4399_PATH, AUTH_OFFICIAL_PATH, AUTH_SAUTH_PATH, PING_PATH, local_base_url,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::health::is_pong;

pub use requests::{Login4399Request, LoginOfficialRequest, LoginSAuthRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned a body that is not JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Client bound to one local server port.
#[derive(Debug, Clone)]
pub struct ProxyApiClient {
    client: Client,
    base_url: String,
}

impl ProxyApiClient {
    pub fn new(port: u16) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self::with_client(client, port))
    }

    pub fn with_client(client: Client, port: u16) -> Self {
        Self {
            client,
            base_url: local_base_url(port),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Liveness check. `Ok(false)` means the server answered something else.
    pub async fn ping(&self) -> Result<bool, ApiError> {
        let url = format!("{}{}", self.base_url, PING_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;
        let body = Self::read_json(url, response).await?;
        Ok(is_pong(&body))
    }

    pub async fn login_4399(&self, request: &Login4399Request) -> Result<Value, ApiError> {
        self.post(AUTH_4399_PATH, request).await
    }

    pub async fn login_sauth(&self, request: &LoginSAuthRequest) -> Result<Value, ApiError> {
        self.post(AUTH_SAUTH_PATH, request).await
    }

    pub async fn login_official(&self, request: &LoginOfficialRequest) -> Result<Value, ApiError> {
        self.post(AUTH_OFFICIAL_PATH, request).await
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;
        Self::read_json(url, response).await
    }

    async fn read_json(url: String, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|source| ApiError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_targets_loopback() {
        let client = ProxyApiClient::with_client(Client::new(), 51234);
        assert_eq!(client.base_url(), "http://127.0.0.1:51234");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        // Port 1 is reserved and never has a listener in test environments.
        let client = ProxyApiClient::new(1).unwrap();
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, ApiError::Request { .. }));
    }
}
