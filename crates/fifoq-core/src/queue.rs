//! Queue, Manager and Factory contracts

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::QueueConfig;
use crate::error::QueueResult;
use crate::message::Message;
use crate::tags::Tags;

/// Queue Identifier
pub type QueueId = Uuid;

/// The backing store a queue uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Store {
    /// Indeterminate backing store
    #[default]
    Unknown,
    /// In-process; contents do not survive a restart
    Memory,
    /// Persisted in SQLite
    Sqlite,
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Memory => f.write_str("memory"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Stores messages for consumption by another process, strictly first in, first out.
#[async_trait]
pub trait Queue: Send + Sync + Debug {
    /// Globally unique identifier for this queue
    fn id(&self) -> QueueId;

    /// Creation time of this queue
    fn created(&self) -> DateTime<Utc>;

    /// Arbitrary key:value pairs associated with this queue
    fn tags(&self) -> &Tags;

    /// Which backing store this queue uses
    fn store(&self) -> Store;

    /// Append a message. Fails with `Full` when the queue is at its limit.
    async fn add(&self, message: Message) -> QueueResult<()>;

    /// Consume and return the oldest message. Fails with `NotFound` when empty.
    async fn pop(&self) -> QueueResult<Message>;

    /// Return the oldest message without consuming it. Fails with `NotFound` when empty.
    async fn peek(&self) -> QueueResult<Message>;
}

/// A directory of live queues keyed by ID.
///
/// A manager controls discoverability only; dropping a queue from the manager
/// leaves existing handles to it usable.
#[async_trait]
pub trait Manager: Send + Sync + Debug {
    /// Register a queue, replacing any queue with the same ID
    async fn add(&self, queue: Arc<dyn Queue>) -> QueueResult<()>;

    /// Look up a queue by ID
    async fn get(&self, id: QueueId) -> QueueResult<Arc<dyn Queue>>;

    /// Forget a queue. Deleting an unknown ID is not an error.
    async fn delete(&self, id: QueueId) -> QueueResult<()>;

    /// Snapshot of all registered queues, in no particular order
    async fn list(&self) -> QueueResult<Vec<Arc<dyn Queue>>>;
}

/// Produces new queues with the requested store and options.
#[async_trait]
pub trait Factory: Send + Sync {
    async fn create(&self, store: Store, config: QueueConfig) -> QueueResult<Arc<dyn Queue>>;
}
