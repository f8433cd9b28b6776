//! Remote PDF retrieval.
//!
//! One GET per call: no retries, no caching, and the HTTP client's
//! default timeout and redirect policy.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::transport::{HttpClient, TransportError};

#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("upstream returned {0}")]
    Status(StatusCode),

    /// No usable response (DNS failure, refused connection, timeout, ...).
    #[error("{0}")]
    Network(String),
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { status, .. } => FetchError::Status(status),
            TransportError::Request(e) => FetchError::Network(e.to_string()),
            TransportError::Decode(msg) => FetchError::Network(msg),
        }
    }
}

/// Retrieves the bytes behind a remote URL.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`RemoteFetcher`] over [`HttpClient`].
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = self.client.get_bytes(url).await?;
        debug!(url, size = bytes.len(), "fetched remote PDF");
        Ok(bytes)
    }
}
