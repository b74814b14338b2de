//! HTTP API client with bearer-token auth.

use std::time::Duration;

use campushub_shared::ApiError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Bound on every request, including the initial snapshot fetches. Expiry
/// surfaces as a network error and never partially mutates anything.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the notification REST endpoints.
///
/// A 401 response comes back as an ordinary `ApiError::Http`; global session
/// invalidation is the caller's concern, not this client's.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: String::new(),
            token: None,
        }
    }

    /// Set the base URL for API requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the bearer token sent in the `Authorization` header.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if self.base_url.is_empty() {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        }
    }

    fn authorize(&self, rb: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => rb.bearer_auth(token),
            None => rb,
        }
    }

    async fn execute<TRes: DeserializeOwned>(
        &self,
        rb: reqwest::RequestBuilder,
    ) -> Result<TRes, ApiError> {
        let resp = rb
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();

        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !is_success {
            return Err(ApiError::Http { status, body: text });
        }

        // Acknowledgement-only endpoints respond with an empty body.
        if text.is_empty() {
            serde_json::from_str("null").map_err(|e| ApiError::Deserialize(e.to_string()))
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))
        }
    }

    /// Make a GET request and deserialize the JSON response.
    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let rb = self.authorize(self.client.get(self.url(path)));
        self.execute(rb).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let rb = self.authorize(self.client.post(self.url(path))).json(body);
        self.execute(rb).await
    }

    /// Make a POST request with no body.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let rb = self.authorize(self.client.post(self.url(path)));
        self.execute(rb).await
    }

    /// Make a PATCH request with no body, expecting no response body.
    pub async fn patch_empty(&self, path: &str) -> Result<(), ApiError> {
        let rb = self.authorize(self.client.patch(self.url(path)));
        self.execute(rb).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
