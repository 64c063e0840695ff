//! SQLite State Store
//!
//! Durable key-value storage for ledger entries and node records.
//!
//! # Schema
//! A single table keyed by the ledger key:
//! - `key`: TEXT primary key
//! - `value`: BLOB, the raw bytes handed to `put`

use super::{StateStore, StoreError};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// SQLite-backed state store
///
/// Each `put` is a single-row upsert, so writes to one key are serialized by
/// SQLite itself.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and ensures the schema
    ///
    /// # Arguments
    /// * `url` - Database URL, e.g. `sqlite://ledger.db` or `sqlite::memory:`
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // An in-memory database exists per connection, so keep exactly one
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS ledger_state (
                key   TEXT PRIMARY KEY NOT NULL,
                value BLOB NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        info!("SQLite state store ready at {}", url);
        Ok(Self { pool })
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let row = sqlx::query("SELECT value FROM ledger_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        match row {
            Some(row) => Ok(Some(row.try_get::<Vec<u8>, _>("value").map_err(store_error)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO ledger_state (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }
}

/// Pool exhaustion and shutdown are transient; everything else is a database error
fn store_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StoreError::Unavailable(e.to_string()),
        other => StoreError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_upsert_and_missing_key() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();

        assert_eq!(store.get("k1").await.unwrap(), None);

        store.put("k1", b"10".to_vec()).await.unwrap();
        store.put("k1", b"25".to_vec()).await.unwrap();
        store.put("node~a", br#"{"ID":"a","Reputation":3}"#.to_vec()).await.unwrap();

        assert_eq!(store.get("k1").await.unwrap(), Some(b"25".to_vec()));
        assert_eq!(
            store.get("node~a").await.unwrap(),
            Some(br#"{"ID":"a","Reputation":3}"#.to_vec())
        );
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.pool.close().await;

        assert!(matches!(store.get("k1").await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.put("k1", b"1".to_vec()).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
