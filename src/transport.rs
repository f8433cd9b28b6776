//! Thin HTTP client used by the CLI and the remote fetch resolver.
//!
//! Responses are decoded by the type the caller asks for (JSON, text, or
//! bytes). Any non-2xx status becomes [`TransportError::Status`] carrying
//! the status and the response body, so callers see what the server said.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("http error: status {status}, body: {body}")]
    Status { status: StatusCode, body: String },

    /// The body could not be decoded as the requested type.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// HTTP client with an optional base URL.
///
/// Paths starting with `http://` or `https://` are used as-is; anything
/// else is appended to the base URL.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    base_url: Option<String>,
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
            inner: reqwest::Client::new(),
        }
    }

    /// Resolves `path` against the base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.base_url {
            Some(base) if path.starts_with('/') => format!("{}{}", base, path),
            Some(base) => format!("{}/{}", base, path),
            None => path.to_string(),
        }
    }

    /// GET returning the response without a status check.
    pub async fn get_raw(&self, path: &str) -> Result<Response, TransportError> {
        Ok(self.inner.get(self.url(path)).send().await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let response = check(self.get_raw(path).await?).await?;
        decode_json(response).await
    }

    pub async fn get_text(&self, path: &str) -> Result<String, TransportError> {
        let response = check(self.get_raw(path).await?).await?;
        Ok(response.text().await?)
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let response = check(self.get_raw(path).await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// POST with a JSON body, decoding a JSON response.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.inner.post(self.url(path)).json(body).send().await?;
        decode_json(check(response).await?).await
    }
}

async fn check(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status { status, body })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
}
