//! Default queue factory

use async_trait::async_trait;
use std::sync::Arc;

use fifoq_core::{Factory, Queue, QueueConfig, QueueError, QueueResult, Store};
use fifoq_persist::SqliteStore;
use fifoq_queue::MemoryQueue;

/// Produces in-memory queues, and SQLite queues when given a store.
#[derive(Debug, Clone, Default)]
pub struct DefaultFactory {
    sqlite: Option<SqliteStore>,
}

impl DefaultFactory {
    /// A factory that can only produce in-memory queues
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sqlite(store: SqliteStore) -> Self {
        Self {
            sqlite: Some(store),
        }
    }
}

#[async_trait]
impl Factory for DefaultFactory {
    async fn create(&self, store: Store, config: QueueConfig) -> QueueResult<Arc<dyn Queue>> {
        match store {
            Store::Memory => Ok(Arc::new(MemoryQueue::new(config))),
            Store::Sqlite => match &self.sqlite {
                Some(sqlite) => Ok(Arc::new(sqlite.create_queue(config).await?)),
                None => Err(QueueError::NotFound("no SQLite store configured".to_string())),
            },
            Store::Unknown => Err(QueueError::Invalid("unknown store type".to_string())),
        }
    }
}
