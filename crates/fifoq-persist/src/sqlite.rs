//! SQLite connection and schema
//!
//! Each queue owns one row in `queues`, keyed by the raw 16 bytes of its ID,
//! holding the serialized metadata, the 8-byte big-endian limit, and the
//! queue's own sequence counter. Messages live in `messages`, keyed by
//! `(queue_id, seq)` where `seq` is the 8-byte big-endian sequence number.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use fifoq_core::{Limit, Metadata, QueueConfig, QueueError, QueueId, QueueResult};

use crate::queue::{id_key, SqliteQueue};

const CREATE_QUEUES: &str = r#"
CREATE TABLE IF NOT EXISTS queues (
    id          BLOB PRIMARY KEY NOT NULL,
    meta        BLOB NOT NULL,
    queue_limit BLOB NOT NULL,
    sequence    INTEGER NOT NULL DEFAULT 0
)
"#;

const CREATE_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    queue_id BLOB NOT NULL REFERENCES queues(id),
    seq      BLOB NOT NULL,
    body     BLOB NOT NULL,
    PRIMARY KEY (queue_id, seq)
) WITHOUT ROWID
"#;

/// SQLite configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database URL (e.g., "sqlite:fifoq.db?mode=rwc" or "sqlite::memory:")
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Enable WAL journal mode so readers never block the writer
    pub wal_mode: bool,
    /// Enable foreign key enforcement
    pub foreign_keys: bool,
    /// Busy timeout in seconds
    pub busy_timeout_secs: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:fifoq.db?mode=rwc".to_string(),
            max_connections: 5,
            wal_mode: true,
            foreign_keys: true,
            busy_timeout_secs: 30,
        }
    }
}

impl SqliteConfig {
    /// Config for an in-process database (testing).
    ///
    /// A `:memory:` database lives and dies with its connection, so the pool
    /// is held to a single connection.
    pub fn memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            wal_mode: false,
            foreign_keys: true,
            busy_timeout_secs: 5,
        }
    }

    /// Config for a database file at `path`, created if missing.
    pub fn file(path: impl AsRef<std::path::Path>) -> Self {
        Self {
            url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            ..Default::default()
        }
    }

    /// Load overrides from `FIFOQ_DATABASE_URL` and `FIFOQ_DATABASE_MAX_CONNECTIONS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("FIFOQ_DATABASE_URL").unwrap_or(defaults.url),
            max_connections: env::var("FIFOQ_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            ..defaults
        }
    }
}

/// A SQLite database holding any number of durable queues.
///
/// Writes on any queue in the same database are serialized by SQLite itself;
/// reads run against a snapshot and do not block writers.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect with default config at `url`
    pub async fn new(url: &str) -> QueueResult<Self> {
        let config = SqliteConfig {
            url: url.to_string(),
            ..Default::default()
        };
        Self::connect(config).await
    }

    pub async fn connect(config: SqliteConfig) -> QueueResult<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| QueueError::Invalid(format!("bad database url {}: {}", config.url, e)))?
            .foreign_keys(config.foreign_keys)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

        if config.wal_mode {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| QueueError::unknown(format!("cannot open {}", config.url), e))?;

        info!(url = %config.url, wal = config.wal_mode, "Connected to SQLite");

        Self::from_pool(pool).await
    }

    /// Use an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> QueueResult<Self> {
        for statement in [CREATE_QUEUES, CREATE_MESSAGES] {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| QueueError::unknown("cannot create schema", e))?;
        }
        debug!("SQLite queue schema ready");
        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create and persist a new queue.
    pub async fn create_queue(&self, config: QueueConfig) -> QueueResult<SqliteQueue> {
        let meta = Metadata::tagged(config.tags);
        let id = meta.id();
        let record = serde_json::to_vec(&meta)
            .map_err(|e| QueueError::unknown("cannot serialize queue metadata", e))?;

        sqlx::query("INSERT INTO queues (id, meta, queue_limit) VALUES (?, ?, ?)")
            .bind(id_key(id))
            .bind(record)
            .bind(config.limit.to_be_bytes().to_vec())
            .execute(&self.pool)
            .await
            .map_err(|e| QueueError::unknown(format!("cannot store queue {}", id), e))?;

        info!(queue_id = %id, limit = %config.limit, "Created SQLite queue");
        Ok(SqliteQueue::new(meta, config.limit, self.pool.clone()))
    }

    /// Open a queue previously created in this database.
    pub async fn open_queue(&self, id: QueueId) -> QueueResult<SqliteQueue> {
        let row = sqlx::query("SELECT meta, queue_limit FROM queues WHERE id = ?")
            .bind(id_key(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| QueueError::unknown(format!("cannot read queue {}", id), e))?
            .ok_or_else(|| QueueError::NotFound(format!("cannot open queue {}", id)))?;

        let record: Vec<u8> = row
            .try_get("meta")
            .map_err(|e| QueueError::unknown("cannot read queue metadata", e))?;
        let meta: Metadata = serde_json::from_slice(&record)
            .map_err(|e| QueueError::unknown("cannot deserialize queue metadata", e))?;
        if meta.id() != id {
            return Err(QueueError::Unknown(format!(
                "queue {} holds metadata for {}",
                id,
                meta.id()
            )));
        }

        let limit: Vec<u8> = row
            .try_get("queue_limit")
            .map_err(|e| QueueError::unknown("cannot read queue limit", e))?;
        let limit = Limit::from_be_bytes(&limit)
            .map_err(|e| QueueError::unknown("cannot decode queue limit", e))?;

        debug!(queue_id = %id, limit = %limit, "Opened SQLite queue");
        Ok(SqliteQueue::new(meta, limit, self.pool.clone()))
    }
}
