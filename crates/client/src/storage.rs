//! Client-local key/value storage for the persisted session and mode flag.
//!
//! Values are opaque strings (JSON in practice). Only the session manager
//! writes the portal's keys.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;

/// Key of the serialized session record.
pub const SESSION_KEY: &str = "authority_auth";

/// Key of the boolean mode record (`true` = simulated).
pub const MODE_KEY: &str = "authority_mock_mode";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage query failed: {0}")]
    Query(String),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-memory store. Survives as long as the `Arc` does, which is what
/// tests use to simulate a relaunch over the same storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum SqliteTarget {
    File(PathBuf),
    Memory,
}

/// SQLite-backed store (one `kv` table).
///
/// The pool is opened lazily on first use, so constructing a store never
/// fails; an unreachable database surfaces as [`StorageError::Unavailable`]
/// on the first read or write.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    target: SqliteTarget,
    pool: Arc<tokio::sync::Mutex<Option<SqlitePool>>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::with_target(SqliteTarget::File(path.as_ref().to_path_buf()))
    }

    /// Private in-memory database; contents vanish with the store.
    pub fn in_memory() -> Self {
        Self::with_target(SqliteTarget::Memory)
    }

    fn with_target(target: SqliteTarget) -> Self {
        Self {
            target,
            pool: Arc::new(tokio::sync::Mutex::new(None)),
        }
    }

    async fn connect(&self) -> anyhow::Result<SqlitePool> {
        let options = match &self.target {
            SqliteTarget::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create storage directory at {:?}", parent))?;
                }
                SqliteConnectOptions::new().filename(path).create_if_missing(true)
            }
            SqliteTarget::Memory => SqliteConnectOptions::new().in_memory(true),
        };

        // A single long-lived connection: the client is the only writer, and an
        // in-memory database only exists as long as its connection.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite store {:?}", self.target))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv table")?;

        Ok(pool)
    }

    async fn pool(&self) -> Result<SqlitePool, StorageError> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }
        let pool = self
            .connect()
            .await
            .map_err(|err| StorageError::Unavailable(format!("{err:#}")))?;
        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let pool = self.pool().await?;
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| StorageError::Query(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let pool = self.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .map_err(|e| StorageError::Query(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let pool = self.pool().await?;
        sqlx::query("DELETE FROM kv WHERE key = ?1")
            .bind(key)
            .execute(&pool)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;
        Ok(())
    }
}

/// `{app_data_dir}/authority-portal/client.db`.
pub fn default_store_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    Ok(base.join("authority-portal").join("client.db"))
}
