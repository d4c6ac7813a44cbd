use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Failures below the route layer: the provider answered with a
/// non-success status, or the request never completed at all.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
}

/// Narrow seam over "GET this URL, give me JSON".
///
/// The memoizer and geocoder only ever need this one call; tests inject a
/// canned implementation with an atomic call counter.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Production fetcher backed by a shared `reqwest` client. Timeouts are
/// the client's own — the route layer adds none of its own retry or
/// cancellation logic.
pub struct HttpJsonFetcher {
    client: reqwest::Client,
}

impl HttpJsonFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl Default for HttpJsonFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}
