//! Append-only audit log of generated scripts

use crate::generator::{GeneratorError, GeneratorResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// One `(timestamp, user, request, script)` record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub request: String,
    pub script: String,
}

impl LogEntry {
    pub fn now(
        user: impl Into<String>,
        request: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            request: request.into(),
            script: script.into(),
        }
    }
}

/// Sink for generated scripts
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: &LogEntry) -> GeneratorResult<()>;

    /// Most recent entries first
    async fn recent(&self, limit: usize) -> GeneratorResult<Vec<LogEntry>>;
}

/// Audit log stored in a SQLite `logs` table
pub struct SqliteAuditLog {
    pool: SqlitePool,
}

impl SqliteAuditLog {
    /// Open (creating if needed) the log database at `path`
    pub async fn open(path: &Path) -> GeneratorResult<Self> {
        debug!("[SqliteAuditLog::open] Opening {}", path.display());
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// A private in-memory log that lives as long as this value
    pub async fn in_memory() -> GeneratorResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> GeneratorResult<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS logs (date TEXT, user TEXT, request TEXT, script TEXT)",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl AuditLog for SqliteAuditLog {
    async fn append(&self, entry: &LogEntry) -> GeneratorResult<()> {
        sqlx::query("INSERT INTO logs (date, user, request, script) VALUES (?, ?, ?, ?)")
            .bind(entry.timestamp.to_rfc3339())
            .bind(entry.user.as_str())
            .bind(entry.request.as_str())
            .bind(entry.script.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> GeneratorResult<Vec<LogEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            "SELECT date, user, request, script FROM logs ORDER BY rowid DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> GeneratorResult<LogEntry> {
                let date: String = row.try_get("date")?;
                let timestamp = DateTime::parse_from_rfc3339(&date)
                    .map_err(|e| GeneratorError::InvalidLogEntry(format!("{date}: {e}")))?
                    .with_timezone(&Utc);
                Ok(LogEntry {
                    timestamp,
                    user: row.try_get("user")?,
                    request: row.try_get("request")?,
                    script: row.try_get("script")?,
                })
            })
            .collect()
    }
}

/// Audit log kept in process memory
#[derive(Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, entry: &LogEntry) -> GeneratorResult<()> {
        self.entries
            .lock()
            .map_err(|e| GeneratorError::InvalidLogEntry(e.to_string()))?
            .push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> GeneratorResult<Vec<LogEntry>> {
        Ok(self.entries().into_iter().rev().take(limit).collect())
    }
}
