//! Core data models used throughout docdrop.
//!
//! An [`IngestedRecord`] is the only persisted entity. Callers hand a
//! [`NewRecord`] to a [`RecordStore`](crate::store::RecordStore), which
//! assigns the identifier and creation timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag for PDF payloads. Any other tag is treated as text.
pub const PDF_SOURCE: &str = "pdf";

/// Record fields supplied by the caller, before the store assigns
/// `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub source: String,
    pub data: String,
}

impl NewRecord {
    pub fn new(source: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            data: data.into(),
        }
    }
}

/// A stored record, as returned by the listing endpoint.
///
/// `data` holds base64 text when `source` is `pdf`, and the raw text
/// otherwise. Records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedRecord {
    pub id: String,
    pub source: String,
    pub data: String,
    pub created_at: DateTime<Utc>,
}

impl IngestedRecord {
    pub fn is_pdf(&self) -> bool {
        self.source == PDF_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_serializes_created_at_in_camel_case() {
        let record = IngestedRecord {
            id: "abc".to_string(),
            source: "text".to_string(),
            data: "hello".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["data"], "hello");
        assert_eq!(json["createdAt"], "2026-01-02T03:04:05Z");
        assert!(json.get("created_at").is_none());

        let back: IngestedRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_is_pdf_matches_exact_tag() {
        let mut record = IngestedRecord {
            id: "1".to_string(),
            source: "pdf".to_string(),
            data: String::new(),
            created_at: Utc::now(),
        };
        assert!(record.is_pdf());
        record.source = "PDF".to_string();
        assert!(!record.is_pdf());
    }
}
