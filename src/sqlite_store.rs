//! SQLite-backed [`RecordStore`] implementation.
//!
//! Records live in a single table named after the configured collection.
//! `created_at` is stored as microseconds since the Unix epoch; an
//! autoincrement `seq` column breaks ordering ties by insertion order.
//!
//! # Lifecycle
//!
//! A `SqliteStore` is constructed once (usually via [`SqliteStore::open`])
//! and shared behind an `Arc`. Schema setup runs on first use and is
//! guarded by a [`OnceCell`], so it executes at most once per store no
//! matter how many requests race to use it.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tokio::sync::OnceCell;
use uuid::Uuid;

use docdrop_core::models::{IngestedRecord, NewRecord};
use docdrop_core::store::{Direction, OrderBy, RecordField, RecordStore};

use crate::config::{self, Config};
use crate::db;
use crate::migrate;

/// SQLite implementation of the [`RecordStore`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
    collection: String,
    schema: OnceCell<()>,
}

impl SqliteStore {
    /// Wraps an existing pool. The schema is created lazily on first use.
    pub fn new(pool: SqlitePool, collection: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        if !config::is_sql_identifier(&collection) {
            anyhow::bail!("invalid collection name: '{}'", collection);
        }
        Ok(Self {
            pool,
            collection,
            schema: OnceCell::new(),
        })
    }

    /// Connects to the configured database and prepares the schema.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config).await?;
        let store = Self::new(pool, config.db.collection.clone())?;
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the collection table if needed. Idempotent.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.schema
            .get_or_try_init(|| migrate::ensure_collection(&self.pool, &self.collection))
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn order_clause(order: OrderBy) -> String {
    let column = match order.field {
        RecordField::CreatedAt => "created_at",
        RecordField::Source => "source",
    };
    let dir = match order.direction {
        Direction::Asc => "ASC",
        Direction::Desc => "DESC",
    };
    format!("ORDER BY {column} {dir}, seq {dir}")
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| anyhow!("stored created_at out of range: {}", micros))
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn add(&self, record: NewRecord) -> Result<String> {
        self.ensure_schema().await?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp_micros();

        // Single statement: the clamp against the latest stored timestamp
        // and the insert happen under one SQLite write lock.
        sqlx::query(&format!(
            r#"
            INSERT INTO {t} (id, source, data, created_at)
            VALUES (?, ?, ?, MAX(?, COALESCE((SELECT MAX(created_at) FROM {t}), 0)))
            "#,
            t = self.collection
        ))
        .bind(&id)
        .bind(&record.source)
        .bind(&record.data)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_all(&self, order: OrderBy) -> Result<Vec<IngestedRecord>> {
        self.ensure_schema().await?;

        let rows = sqlx::query(&format!(
            "SELECT id, source, data, created_at FROM {} {}",
            self.collection,
            order_clause(order)
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<IngestedRecord> {
                Ok(IngestedRecord {
                    id: row.try_get("id")?,
                    source: row.try_get("source")?,
                    data: row.try_get("data")?,
                    created_at: from_micros(row.try_get("created_at")?)?,
                })
            })
            .collect()
    }
}
