//! Cancellable HTTP transport.

use serde::Serialize;
use serde_json::Value;

use super::cancel::CancelToken;
use super::error::ApiError;

/// Default base URL, matching the local mock server.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Configuration for the search API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a new config with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Raise a [`ApiError::Status`] for non-success responses.
pub fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
        })
    }
}

/// HTTP client for the search API.
///
/// Every method takes a [`CancelToken`] and races the underlying call
/// against it, so an aborted request resolves to [`ApiError::Cancelled`]
/// promptly instead of waiting out the network. Each call is exactly one
/// attempt; retry policy, if any, belongs to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Issue a GET request with URL-encoded query parameters.
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        cancel: &CancelToken,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.get(&url).query(query).send();

        let mut cancel = cancel.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            response = request => Ok(response?),
        }
    }

    /// Issue a POST request with a JSON body.
    pub async fn post_json<B>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancelToken,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.post(&url).json(body).send();

        let mut cancel = cancel.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            response = request => Ok(response?),
        }
    }

    /// Decode a response body as JSON. This is its own suspension point:
    /// cancellation arriving mid-decode aborts here too.
    pub async fn read_json(
        &self,
        response: reqwest::Response,
        cancel: &CancelToken,
    ) -> Result<Value, ApiError> {
        let mut cancel = cancel.clone();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            body = response.json::<Value>() => Ok(body?),
        }
    }
}
