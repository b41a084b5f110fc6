//! Order Backend Integration
//!
//! Abstraction over the service that answers order-detail reads, plus the
//! live HTTP implementation.

mod mock;

pub use mock::MockOrderBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Order backend client trait (Strategy pattern)
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Fetch the detail payload for an order number
    async fn fetch(&self, number: &str) -> Result<serde_json::Value>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}

/// Live HTTP order backend
///
/// One GET per lookup with a bearer token; no retry, transport-default
/// timeout. Transport and decode failures propagate so the registry can
/// embed them in the call's result.
pub struct HttpOrderBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpOrderBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    async fn fetch(&self, number: &str) -> Result<serde_json::Value> {
        let url = format!("{}/admin/direct/ai/{}", self.base_url, number);

        let payload = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        tracing::debug!(number, "fetched order detail");
        Ok(payload)
    }

    fn name(&self) -> &str {
        "HttpOrderBackend"
    }
}
