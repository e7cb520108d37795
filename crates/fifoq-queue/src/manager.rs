//! In-memory queue manager

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use fifoq_core::{Manager, Queue, QueueError, QueueId, QueueResult};

/// A registry of live queues keyed by ID.
///
/// The lock guards only the map; it is never held while a queue operation runs.
#[derive(Debug, Default)]
pub struct QueueManager {
    queues: RwLock<HashMap<QueueId, Arc<dyn Queue>>>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queues.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.read().is_empty()
    }
}

// Map operations always succeed; the Result return is kept for managers
// backed by stores that can reject.
#[async_trait]
impl Manager for QueueManager {
    async fn add(&self, queue: Arc<dyn Queue>) -> QueueResult<()> {
        self.queues.write().insert(queue.id(), queue);
        Ok(())
    }

    async fn get(&self, id: QueueId) -> QueueResult<Arc<dyn Queue>> {
        self.queues
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| QueueError::NotFound(format!("cannot find queue with id {}", id)))
    }

    async fn delete(&self, id: QueueId) -> QueueResult<()> {
        self.queues.write().remove(&id);
        Ok(())
    }

    async fn list(&self) -> QueueResult<Vec<Arc<dyn Queue>>> {
        Ok(self.queues.read().values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryQueue;
    use fifoq_core::{Message, QueueConfig};
    use std::collections::HashSet;

    fn fixtures() -> Vec<Arc<dyn Queue>> {
        vec![
            Arc::new(MemoryQueue::new(
                QueueConfig::bounded(100).with_tag("position", "CAPCOM"),
            )),
            Arc::new(MemoryQueue::new(
                QueueConfig::default().with_tag("position", "FLIGHT"),
            )),
            Arc::new(MemoryQueue::unbounded()),
        ]
    }

    #[tokio::test]
    async fn test_manager_lifecycle() {
        let manager = QueueManager::new();
        let queues = fixtures();

        for queue in &queues {
            manager.add(Arc::clone(queue)).await.unwrap();
        }
        assert_eq!(manager.len(), 3);

        for queue in &queues {
            let got = manager.get(queue.id()).await.unwrap();
            assert_eq!(got.id(), queue.id());
            assert_eq!(got.created(), queue.created());
            assert_eq!(got.tags(), queue.tags());
            assert!(Arc::ptr_eq(&got, queue));
        }

        let want: HashSet<QueueId> = queues.iter().map(|q| q.id()).collect();
        let got: HashSet<QueueId> = manager
            .list()
            .await
            .unwrap()
            .iter()
            .map(|q| q.id())
            .collect();
        assert_eq!(want, got);

        for queue in &queues {
            manager.delete(queue.id()).await.unwrap();
            let err = manager.get(queue.id()).await.unwrap_err();
            assert!(err.is_not_found(), "{err}");
        }
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_add_overwrites_same_id() {
        let manager = QueueManager::new();
        let queue: Arc<dyn Queue> = Arc::new(MemoryQueue::unbounded());

        manager.add(Arc::clone(&queue)).await.unwrap();
        manager.add(Arc::clone(&queue)).await.unwrap();
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_ok() {
        let manager = QueueManager::new();
        manager.delete(QueueId::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_deleted_queue_stays_usable() {
        let manager = QueueManager::new();
        let queue: Arc<dyn Queue> = Arc::new(MemoryQueue::unbounded());
        manager.add(Arc::clone(&queue)).await.unwrap();

        let handle = manager.get(queue.id()).await.unwrap();
        manager.delete(queue.id()).await.unwrap();

        handle.add(Message::new("still here")).await.unwrap();
        assert_eq!(queue.pop().await.unwrap().payload(), b"still here");
    }
}
