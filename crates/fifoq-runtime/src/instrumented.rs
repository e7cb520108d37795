//! Instrumented queue manager
//!
//! Wraps a manager in logging and, as each queue is registered, wraps the
//! queue first in metrics and then in logging. Every queue later returned by
//! `get` or `list` therefore already carries both.

use async_trait::async_trait;
use std::sync::Arc;

use fifoq_core::{Manager, Metrics, NopMetrics, Queue, QueueId, QueueResult};

use crate::logging::{LoggingManager, LoggingQueue};
use crate::metrics::MetricsQueue;

#[derive(Debug)]
pub struct InstrumentedManager {
    inner: LoggingManager,
    metrics: Arc<dyn Metrics>,
}

impl InstrumentedManager {
    pub fn new(manager: Arc<dyn Manager>, metrics: Arc<dyn Metrics>) -> Self {
        Self {
            inner: LoggingManager::new(manager),
            metrics,
        }
    }

    /// Logging only; metrics are discarded.
    pub fn logging_only(manager: Arc<dyn Manager>) -> Self {
        Self::new(manager, Arc::new(NopMetrics))
    }
}

#[async_trait]
impl Manager for InstrumentedManager {
    async fn add(&self, queue: Arc<dyn Queue>) -> QueueResult<()> {
        // Metrics sits closest to the raw queue, logging outermost.
        let queue: Arc<dyn Queue> = Arc::new(MetricsQueue::new(queue, Arc::clone(&self.metrics)));
        let queue: Arc<dyn Queue> = Arc::new(LoggingQueue::new(queue));
        self.inner.add(queue).await
    }

    async fn get(&self, id: QueueId) -> QueueResult<Arc<dyn Queue>> {
        self.inner.get(id).await
    }

    async fn delete(&self, id: QueueId) -> QueueResult<()> {
        self.inner.delete(id).await
    }

    async fn list(&self) -> QueueResult<Vec<Arc<dyn Queue>>> {
        self.inner.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fifoq_core::{CounterMetrics, ErrorKind, Message, QueueConfig};
    use fifoq_queue::{MemoryQueue, QueueManager};

    #[tokio::test]
    async fn test_registered_queues_are_metered() {
        let metrics = Arc::new(CounterMetrics::new());
        let manager = InstrumentedManager::new(Arc::new(QueueManager::new()), metrics.clone());

        let raw: Arc<dyn Queue> = Arc::new(MemoryQueue::new(QueueConfig::bounded(1)));
        let id = raw.id();
        manager.add(raw).await.unwrap();

        let queue = manager.get(id).await.unwrap();
        assert_eq!(queue.id(), id);
        queue.add(Message::new("a")).await.unwrap();
        assert!(queue.add(Message::new("b")).await.unwrap_err().is_full());
        queue.pop().await.unwrap();
        assert!(queue.peek().await.unwrap_err().is_not_found());

        let counters = metrics.snapshot(id);
        assert_eq!(counters.enqueued, 1);
        assert_eq!(counters.consumed, 1);
        assert_eq!(counters.errors_of(ErrorKind::Full), 1);
        assert_eq!(counters.errors_of(ErrorKind::NotFound), 1);
    }

    #[tokio::test]
    async fn test_listed_queues_are_metered() {
        let metrics = Arc::new(CounterMetrics::new());
        let manager = InstrumentedManager::new(Arc::new(QueueManager::new()), metrics.clone());
        manager.add(Arc::new(MemoryQueue::unbounded())).await.unwrap();

        let queues = manager.list().await.unwrap();
        assert_eq!(queues.len(), 1);
        queues[0].add(Message::new("x")).await.unwrap();

        assert_eq!(metrics.snapshot(queues[0].id()).enqueued, 1);
    }

    #[tokio::test]
    async fn test_delete_hides_queue() {
        let manager = InstrumentedManager::logging_only(Arc::new(QueueManager::new()));
        let queue: Arc<dyn Queue> = Arc::new(MemoryQueue::unbounded());
        let id = queue.id();
        manager.add(queue).await.unwrap();
        manager.delete(id).await.unwrap();

        assert!(manager.get(id).await.unwrap_err().is_not_found());
    }
}
