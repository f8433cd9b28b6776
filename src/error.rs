//! Errors surfaced by the ingestion and listing endpoints.
//!
//! Every variant maps to one HTTP status and one `{"error": "..."}` body.
//! Nothing below this boundary leaks raw internal errors to the caller,
//! except [`IngestError::Query`], which carries the store's message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::fetch::FetchError;

/// Message returned when `source` or `data` is absent or empty.
pub const MISSING_FIELD_MESSAGE: &str = "Missing source or data";

/// Message returned when the store rejects an insert.
pub const PERSISTENCE_MESSAGE: &str = "Could not save data to the database.";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Missing source or data")]
    MissingField,

    /// The request body is not JSON, or its fields are not strings.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// A data URL in `data` could not be decoded.
    #[error("Invalid data payload: {0}")]
    InvalidPayload(String),

    #[error("Error fetching PDF from URL: {0}")]
    RemoteFetch(#[from] FetchError),

    #[error("Could not save data to the database.")]
    Persistence,

    #[error("An error occurred while fetching data: {0}")]
    Query(String),
}

impl IngestError {
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::MissingField
            | IngestError::InvalidBody(_)
            | IngestError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            IngestError::RemoteFetch(_) | IngestError::Persistence | IngestError::Query(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(IngestError::MissingField.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            IngestError::InvalidPayload("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IngestError::Persistence.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            IngestError::RemoteFetch(FetchError::Status(StatusCode::NOT_FOUND)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(IngestError::MissingField.to_string(), MISSING_FIELD_MESSAGE);
        assert_eq!(IngestError::Persistence.to_string(), PERSISTENCE_MESSAGE);
        assert_eq!(
            IngestError::RemoteFetch(FetchError::Status(StatusCode::NOT_FOUND)).to_string(),
            "Error fetching PDF from URL: upstream returned 404 Not Found"
        );
        assert_eq!(
            IngestError::Query("disk I/O error".into()).to_string(),
            "An error occurred while fetching data: disk I/O error"
        );
    }
}
