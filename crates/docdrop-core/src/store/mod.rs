//! Storage abstraction for docdrop.
//!
//! The [`RecordStore`] trait is the only interface the ingestion and
//! listing pipeline has to the document database. It has exactly two
//! operations: insert a record, and scan every record in a given order.
//!
//! Implementations must be `Send + Sync` so a single store can be shared
//! across request handlers behind an `Arc`.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{IngestedRecord, NewRecord};

/// Field a full scan can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    CreatedAt,
    Source,
}

/// Sort direction of a full scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Ordering of a [`RecordStore::list_all`] scan.
///
/// Ties on `field` fall back to insertion order, in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: RecordField,
    pub direction: Direction,
}

impl OrderBy {
    /// Most recently created first. This is the listing order.
    pub const NEWEST_FIRST: OrderBy = OrderBy {
        field: RecordField::CreatedAt,
        direction: Direction::Desc,
    };

    pub fn new(field: RecordField, direction: Direction) -> Self {
        Self { field, direction }
    }
}

/// Abstract document store holding [`IngestedRecord`]s.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`add`](RecordStore::add) | Insert a record, assigning `id` and `createdAt` |
/// | [`list_all`](RecordStore::list_all) | Full scan in the requested order |
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new record and returns its assigned id.
    ///
    /// Atomic: on error, nothing has been stored. The assigned
    /// `createdAt` is never earlier than that of any record already in
    /// the store.
    async fn add(&self, record: NewRecord) -> Result<String>;

    /// Returns every stored record in the requested order.
    async fn list_all(&self, order: OrderBy) -> Result<Vec<IngestedRecord>>;
}
