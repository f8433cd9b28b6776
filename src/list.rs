//! Record listing, newest first.
//!
//! Used by the `GET /api/data` endpoint. The whole collection is returned
//! on every call.

use tracing::error;

use docdrop_core::models::IngestedRecord;
use docdrop_core::store::{OrderBy, RecordStore};

use crate::error::IngestError;

pub async fn list_records(store: &dyn RecordStore) -> Result<Vec<IngestedRecord>, IngestError> {
    store.list_all(OrderBy::NEWEST_FIRST).await.map_err(|e| {
        error!(error = %e, "error fetching records");
        IngestError::Query(e.to_string())
    })
}
