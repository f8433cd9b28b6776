//! Ingestion pipeline.
//!
//! Validates an ingestion request, resolves remote PDFs, normalizes the
//! payload, and persists exactly one record:
//!
//! ```text
//! request ─▶ presence check ─▶ Payload::classify ─┬─ PdfUrl ──▶ fetch ─┐
//!                                                  └─ Text / PdfInline ─┴▶ normalize ─▶ store.add
//! ```
//!
//! Every failure happens before `store.add`, or is `store.add` itself, so
//! a failed request never leaves a record behind.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use docdrop_core::models::NewRecord;
use docdrop_core::normalize::{normalize, normalize_fetched, Payload};
use docdrop_core::store::RecordStore;

use crate::error::IngestError;
use crate::fetch::RemoteFetcher;

/// Message returned on a successful ingestion.
pub const SUCCESS_MESSAGE: &str = "Data normalized and saved successfully.";

/// Body of `POST /api/ingest`.
///
/// Both fields are optional at the type level so a missing field is
/// reported as [`IngestError::MissingField`] rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

impl IngestRequest {
    pub fn new(source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            data: Some(data.into()),
        }
    }
}

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub id: String,
    pub message: String,
}

fn require(field: Option<String>) -> Result<String, IngestError> {
    field
        .filter(|value| !value.is_empty())
        .ok_or(IngestError::MissingField)
}

/// Runs one ingestion request to completion.
pub async fn ingest(
    store: &dyn RecordStore,
    fetcher: &dyn RemoteFetcher,
    request: IngestRequest,
) -> Result<IngestOutcome, IngestError> {
    let source = require(request.source)?;
    let data = require(request.data)?;

    let payload = Payload::classify(&source, data)
        .map_err(|e| IngestError::InvalidPayload(e.to_string()))?;
    let kind = payload.kind();

    let stored = match &payload {
        Payload::PdfUrl(url) => match fetcher.fetch(url).await {
            Ok(bytes) => {
                info!(url = %url, size = bytes.len(), "fetched PDF from URL");
                normalize_fetched(&bytes)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "error fetching PDF from URL");
                return Err(IngestError::RemoteFetch(e));
            }
        },
        Payload::Text(_) | Payload::PdfInline(_) => {
            normalize(&payload).map_err(|e| IngestError::InvalidPayload(e.to_string()))?
        }
    };

    let id = store
        .add(NewRecord::new(source.as_str(), stored))
        .await
        .map_err(|e| {
            error!(source = %source, error = %e, "error adding record");
            IngestError::Persistence
        })?;

    info!(id = %id, source = %source, kind, "record saved");

    Ok(IngestOutcome {
        id,
        message: SUCCESS_MESSAGE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use docdrop_core::models::IngestedRecord;
    use docdrop_core::store::memory::InMemoryStore;
    use docdrop_core::store::OrderBy;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves fixed bytes and counts calls.
    struct StaticFetcher {
        bytes: Vec<u8>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(bytes: &[u8]) -> Self {
            Self {
                bytes: bytes.to_vec(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RemoteFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl RemoteFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Status(StatusCode::NOT_FOUND))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn add(&self, _record: NewRecord) -> anyhow::Result<String> {
            Err(anyhow!("database is locked"))
        }

        async fn list_all(&self, _order: OrderBy) -> anyhow::Result<Vec<IngestedRecord>> {
            Err(anyhow!("database is locked"))
        }
    }

    #[tokio::test]
    async fn test_text_ingest_stores_verbatim() {
        let store = InMemoryStore::new();
        let fetcher = StaticFetcher::new(b"");

        let outcome = ingest(&store, &fetcher, IngestRequest::new("text", "hello"))
            .await
            .unwrap();
        assert_eq!(outcome.message, SUCCESS_MESSAGE);

        let records = store.list_all(OrderBy::NEWEST_FIRST).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, outcome.id);
        assert_eq!(records[0].data, "hello");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_or_empty_fields_are_rejected() {
        let store = InMemoryStore::new();
        let fetcher = StaticFetcher::new(b"");

        let cases = vec![
            IngestRequest::default(),
            IngestRequest {
                source: Some("text".into()),
                data: None,
            },
            IngestRequest {
                source: None,
                data: Some("hello".into()),
            },
            IngestRequest::new("", "hello"),
            IngestRequest::new("text", ""),
        ];

        for request in cases {
            let err = ingest(&store, &fetcher, request).await.unwrap_err();
            assert!(matches!(err, IngestError::MissingField));
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_url_is_fetched_and_encoded() {
        let store = InMemoryStore::new();
        let fetcher = StaticFetcher::new(b"%PDF-1.5 remote");

        ingest(
            &store,
            &fetcher,
            IngestRequest::new("pdf", "https://example.com/doc.pdf"),
        )
        .await
        .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        let records = store.list_all(OrderBy::NEWEST_FIRST).await.unwrap();
        assert_eq!(records[0].source, "pdf");
        assert_eq!(
            STANDARD.decode(&records[0].data).unwrap(),
            b"%PDF-1.5 remote"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_stores_nothing() {
        let store = InMemoryStore::new();

        let err = ingest(
            &store,
            &FailingFetcher,
            IngestRequest::new("pdf", "http://bad.invalid/x.pdf"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, IngestError::RemoteFetch(_)));
        assert!(err.to_string().contains("404 Not Found"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_data_url_stores_nothing() {
        let store = InMemoryStore::new();
        let fetcher = StaticFetcher::new(b"");

        let err = ingest(
            &store,
            &fetcher,
            IngestRequest::new("pdf", "data:application/pdf;base64,!!!"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, IngestError::InvalidPayload(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_generic() {
        let fetcher = StaticFetcher::new(b"");

        let err = ingest(&BrokenStore, &fetcher, IngestRequest::new("text", "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Persistence));
        assert!(!err.to_string().contains("locked"));
    }
}
