//! Timed JSON fetching.

use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = concat!("fedigraph/", env!("CARGO_PKG_VERSION"));

/// Default deadline for one request to answer with a status line and headers.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can turn a URL into a JSON document.
///
/// [`TimedFetch`] is the production implementation; the cache gate only
/// depends on this trait.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, url: &str, headers: &HeaderMap) -> Result<Value, FetchError>;
}

/// A GET-only HTTP client that gives up after a fixed deadline.
///
/// The deadline runs until the response headers arrive. When it elapses the
/// in-flight request is dropped. Reading the body is not timed, so a large
/// document that is already streaming is not cut off.
#[derive(Debug, Clone)]
pub struct TimedFetch {
    client: Client,
    timeout: Duration,
}

impl TimedFetch {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, url: &str, headers: &HeaderMap) -> Result<Response, FetchError> {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .headers(headers.clone())
            .send();

        match tokio::time::timeout(self.timeout, request).await {
            Ok(response) => Ok(response?.error_for_status()?),
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
                after: self.timeout,
            }),
        }
    }
}

#[async_trait]
impl JsonSource for TimedFetch {
    async fn get_json(&self, url: &str, headers: &HeaderMap) -> Result<Value, FetchError> {
        debug!("GET {}", url);
        let response = self.send(url, headers).await?;
        Ok(response.json::<Value>().await?)
    }
}

/// Builds the `Authorization: Bearer <token>` header set used by the registry.
pub fn bearer_headers(token: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
