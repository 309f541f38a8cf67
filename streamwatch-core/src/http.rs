//! HTTP client abstraction for outbound API calls
//!
//! Notifiers talk to their provider through this trait rather than holding a
//! `reqwest::Client` directly, so tests can swap in a mock and assert on the
//! exact URL and payload without touching the network.
//!
//! # Example Usage:
//! ``
//! use streamwatch_core::http::{HttpClient, DefaultHttpClient};
//!
//! let client: Arc<dyn HttpClient> = Arc::new(DefaultHttpClient::new()?);
//! let body = client.post_json(url, serde_json::json!({"text": "hi"})).await?;
//! ``

use std::time::Duration;
use async_trait::async_trait;
use reqwest;
use serde_json::Value;
use crate::Error;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POSTs `body` as JSON. Non-2xx statuses are returned, not raised;
    /// only transport failures are errors.
    async fn post_json(&self, url: &str, body: Value) -> Result<HttpResponse, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Errors if the underlying client cannot be built (TLS backend init).
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn post_json(&self, url: &str, body: Value) -> Result<HttpResponse, Error> {
        let response = self.client
            .post(url)
            .json(&body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
