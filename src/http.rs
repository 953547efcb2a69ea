//! HTTP access for the tagging pipeline
//!
//! Every network call made while tagging goes through [`Transport`], so the
//! pipeline can run against canned responses in tests.

use crate::error::{Result, TaggerError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Minimal GET-only transport used by the resolver, scraper and API client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch a URL as text, optionally sending a bearer token.
    ///
    /// Non-success statuses are returned as [`TaggerError::Http`].
    async fn get_text(&self, url: &str, bearer: Option<&str>) -> Result<String>;

    /// Fetch a URL as raw bytes (used for cover art).
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// `reqwest`-backed transport with default timeouts and no retries.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().user_agent(user_agent).build()?,
        })
    }

    async fn send(&self, url: &str, bearer: Option<&str>) -> Result<reqwest::Response> {
        debug!("GET {}", url);

        let mut req = self.client.get(url);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TaggerError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get_text(&self, url: &str, bearer: Option<&str>) -> Result<String> {
        let text = self.send(url, bearer).await?.text().await?;
        debug!("Response received, length: {} bytes", text.len());
        Ok(text)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self.send(url, None).await?.bytes().await?;
        debug!("Binary response received, length: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
