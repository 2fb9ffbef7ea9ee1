//! HTTP transport for the content item API
//!
//! Anonymous reads only: no authentication header is sent, so the backend's
//! public role must allow read access to every collection and field used.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{data_array, ItemTransport, Result};
use crate::error::FetchError;
use crate::query::ItemRequest;

/// Content API client over reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a client for the given base URL (e.g. `http://directus:8055`)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self::with_client(http, base_url))
    }

    /// Create with an existing reqwest client
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ItemTransport for HttpTransport {
    async fn fetch(&self, request: &ItemRequest) -> Result<Vec<Value>> {
        let url = request.url(&self.base_url)?;
        let url_text = url.to_string();

        tracing::debug!(url = %url_text, "Fetching items");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url_text.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or(""),
                url = %url_text,
                body = %crate::error::truncate_body(&body),
                "Content API error"
            );
            return Err(FetchError::status(status.as_u16(), url_text, &body));
        }

        let envelope: Value = response.json().await.map_err(|e| FetchError::Decode {
            url: url_text.clone(),
            reason: e.to_string(),
        })?;

        let items = data_array(envelope);
        tracing::debug!(url = %url_text, count = items.len(), "Fetched items");
        Ok(items)
    }
}
