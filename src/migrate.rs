//! Schema setup for the record collection.
//!
//! Every statement is `IF NOT EXISTS`, so running migrations against an
//! existing database is a no-op.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::debug;

use crate::config::{self, Config};
use crate::db;

/// Creates the collection table and its ordering index.
///
/// `collection` must already be validated as a SQL identifier.
pub async fn ensure_collection(pool: &SqlitePool, collection: &str) -> Result<()> {
    debug_assert!(config::is_sql_identifier(collection));

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {collection} (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            source TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_{collection}_created_at ON {collection}(created_at DESC)"
    ))
    .execute(pool)
    .await?;

    debug!(collection, "schema ready");
    Ok(())
}

/// Entry point for `docdrop init`.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    ensure_collection(&pool, &config.db.collection).await?;
    pool.close().await;
    Ok(())
}
