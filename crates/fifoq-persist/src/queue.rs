//! Durable FIFO queue on SQLite
//!
//! Messages are keyed by a per-queue sequence number that only ever grows.
//! `pop` always removes the smallest key, so the live keys of a queue form a
//! contiguous range and its length is `(max - min) + 1` without a scan. Any
//! feature that removes messages out of order would break that count.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::Row;

use fifoq_core::{Limit, Message, Metadata, Queue, QueueError, QueueId, QueueResult, Store, Tags};

/// Raw bytes of a queue ID, as stored in the `queues` and `messages` tables.
pub(crate) fn id_key(id: QueueId) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn seq_key(seq: u64) -> Vec<u8> {
    seq.to_be_bytes().to_vec()
}

fn seq_from_key(key: &[u8]) -> QueueResult<u64> {
    let raw: [u8; 8] = key.try_into().map_err(|_| {
        QueueError::Unknown(format!("message key must be 8 bytes, got {}", key.len()))
    })?;
    Ok(u64::from_be_bytes(raw))
}

fn decode(body: &[u8]) -> QueueResult<Message> {
    serde_json::from_slice(body).map_err(|e| QueueError::unknown("cannot deserialize message", e))
}

/// Number of live messages, from the first and last sequence keys.
async fn length(conn: &mut SqliteConnection, key: &[u8]) -> QueueResult<u64> {
    let row = sqlx::query("SELECT MIN(seq) AS first, MAX(seq) AS last FROM messages WHERE queue_id = ?")
        .bind(key.to_vec())
        .fetch_one(conn)
        .await
        .map_err(|e| QueueError::unknown("cannot count messages", e))?;

    let first: Option<Vec<u8>> = row
        .try_get("first")
        .map_err(|e| QueueError::unknown("cannot read first message key", e))?;
    let last: Option<Vec<u8>> = row
        .try_get("last")
        .map_err(|e| QueueError::unknown("cannot read last message key", e))?;

    match (first, last) {
        (Some(first), Some(last)) => Ok(seq_from_key(&last)? - seq_from_key(&first)? + 1),
        _ => Ok(0),
    }
}

/// A FIFO queue persisted in a [`SqliteStore`](crate::SqliteStore).
///
/// Handles are cheap to clone; every clone addresses the same stored queue.
#[derive(Debug, Clone)]
pub struct SqliteQueue {
    meta: Metadata,
    limit: Limit,
    pool: SqlitePool,
}

impl SqliteQueue {
    pub(crate) fn new(meta: Metadata, limit: Limit, pool: SqlitePool) -> Self {
        Self { meta, limit, pool }
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// Current number of stored messages
    pub async fn len(&self) -> QueueResult<u64> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| QueueError::unknown("cannot acquire connection", e))?;
        length(&mut *conn, &id_key(self.id())).await
    }

    pub async fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len().await? == 0)
    }
}

#[async_trait]
impl Queue for SqliteQueue {
    fn id(&self) -> QueueId {
        self.meta.id()
    }

    fn created(&self) -> DateTime<Utc> {
        self.meta.created()
    }

    // Tag changes are held in memory only; the stored metadata keeps the
    // tags the queue was created with.
    fn tags(&self) -> &Tags {
        self.meta.tags()
    }

    fn store(&self) -> Store {
        Store::Sqlite
    }

    async fn add(&self, message: Message) -> QueueResult<()> {
        let id = self.id();
        let key = id_key(id);
        let body = serde_json::to_vec(&message)
            .map_err(|e| QueueError::unknown("cannot serialize message", e))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| QueueError::unknown("cannot begin transaction", e))?;

        // Bumping the sequence first takes the write lock before anything is read.
        let seq: Option<i64> =
            sqlx::query_scalar("UPDATE queues SET sequence = sequence + 1 WHERE id = ? RETURNING sequence")
                .bind(key.clone())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| QueueError::unknown("cannot store message in queue", e))?;
        let seq = seq.ok_or_else(|| QueueError::NotFound(format!("cannot open queue {}", id)))?;

        if let Limit::Bounded(limit) = self.limit {
            if length(&mut *tx, &key).await? >= limit {
                return Err(QueueError::full(id, limit));
            }
        }

        sqlx::query("INSERT INTO messages (queue_id, seq, body) VALUES (?, ?, ?)")
            .bind(key)
            .bind(seq_key(seq as u64))
            .bind(body)
            .execute(&mut *tx)
            .await
            .map_err(|e| QueueError::unknown("cannot store message in queue", e))?;

        tx.commit()
            .await
            .map_err(|e| QueueError::unknown("cannot store message in queue", e))
    }

    async fn pop(&self) -> QueueResult<Message> {
        let id = self.id();
        let key = id_key(id);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| QueueError::unknown("cannot begin transaction", e))?;

        let body: Option<Vec<u8>> = sqlx::query_scalar(
            r#"
            DELETE FROM messages
            WHERE queue_id = ?
              AND seq = (SELECT MIN(seq) FROM messages WHERE queue_id = ?)
            RETURNING body
            "#,
        )
        .bind(key.clone())
        .bind(key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| QueueError::unknown("cannot pop from queue", e))?;

        let message = decode(&body.ok_or_else(|| QueueError::empty(id))?)?;

        tx.commit()
            .await
            .map_err(|e| QueueError::unknown("cannot pop from queue", e))?;
        Ok(message)
    }

    async fn peek(&self) -> QueueResult<Message> {
        let id = self.id();
        let body: Option<Vec<u8>> = sqlx::query_scalar(
            "SELECT body FROM messages WHERE queue_id = ? ORDER BY seq ASC LIMIT 1",
        )
        .bind(id_key(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| QueueError::unknown("cannot peek into queue", e))?;

        decode(&body.ok_or_else(|| QueueError::empty(id))?)
    }
}
