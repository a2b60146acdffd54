//! HTTP transport seam.
//!
//! Every provider request goes through `JsonSource`, so tests can swap the
//! network out entirely and count calls.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::ProviderError;

/// Fetch a URL and decode the body as JSON.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// `provider` is only used to label errors and log lines.
    async fn get_json(&self, provider: &str, url: &str) -> Result<Value, ProviderError>;
}

/// `JsonSource` backed by a shared reqwest client.
pub struct HttpJsonClient {
    http: Client,
}

impl HttpJsonClient {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl JsonSource for HttpJsonClient {
    async fn get_json(&self, provider: &str, url: &str) -> Result<Value, ProviderError> {
        debug!(provider, url, "GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::transport(provider, e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                provider: provider.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| ProviderError::malformed(provider, e.to_string()))
    }
}
