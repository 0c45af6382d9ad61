//! Batch delivery transport.
//!
//! Defines the `Transport` trait the dispatcher posts batches through.
//! The dispatcher treats the outcome as all-or-nothing per batch: any
//! network error, timeout, or non-2xx status is a failed attempt, with no
//! status-code-specific handling and no partial-batch success.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{BeaconError, Result};

/// HTTP request timeout
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivery transport for serialized bulk payloads
///
/// Implement this trait to substitute the wire protocol, e.g. with an
/// in-memory transport in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one serialized bulk payload to the collector.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, timeout, or a non-2xx
    /// response. The dispatcher interprets any error as a failed attempt.
    async fn post(&self, url: &str, body: String, api_key: &str) -> Result<()>;

    /// Transport name for logging/debugging
    fn name(&self) -> &'static str;
}

/// HTTP transport posting JSON bulk payloads via reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default request timeout
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: String, api_key: &str) -> Result<()> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Auth-Token", api_key)
            .body(body)
            .send()
            .await
            .map_err(|e| BeaconError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BeaconError::Server(response.status().as_u16()))
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
