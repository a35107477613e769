//! Resilient JSON fetching over HTTP

use crate::config::PicksConfig;
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Source of parsed JSON documents addressed by API path and query string
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// GET `path` (relative to the API root) and return the parsed body
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;
}

/// Bounded retry with linear backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Attempt `n` is followed by a wait of `n * backoff_base`
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff_base }
    }

    pub fn from_config(config: &PicksConfig) -> Self {
        Self::new(config.retry.max_attempts, config.backoff_base())
    }

    /// Delay after the given (1-based) failed attempt, saturating at `Duration::MAX`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    pub async fn run<F, Fut, T>(&self, url: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    warn!("Attempt {} for {} failed: {}, retrying in {:?}", attempt, url, e, delay);
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// HTTP client for the fantasy premier league API
///
/// One instance is built per run and shared by reference, so the
/// underlying connection pool is reused across every request.
pub struct FplClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl FplClient {
    /// Create a new client from configuration
    pub fn new(config: &PicksConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.api.user_agent.as_str())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api.base_url.clone(),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    async fn get_once(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(url));
        }
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        let body = response.text().await.map_err(|e| FetchError::transport(url, e.to_string()))?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url: url.to_string(), source })
    }
}

#[async_trait]
impl JsonSource for FplClient {
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        self.retry.run(&url, || self.get_once(&url, query)).await
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
