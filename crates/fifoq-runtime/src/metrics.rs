//! Metrics decorator for queues

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use fifoq_core::{ErrorKind, Message, Metrics, Queue, QueueError, QueueId, QueueResult, Store, Tags};

/// Wraps a queue, counting enqueued and consumed messages and failures.
///
/// Errors are counted by kind and returned unchanged.
#[derive(Debug)]
pub struct MetricsQueue {
    inner: Arc<dyn Queue>,
    metrics: Arc<dyn Metrics>,
}

impl MetricsQueue {
    pub fn new(inner: Arc<dyn Queue>, metrics: Arc<dyn Metrics>) -> Self {
        Self { inner, metrics }
    }

    fn failed(&self, err: QueueError) -> QueueError {
        self.metrics.error(self.id(), ErrorKind::metric_label(&err));
        err
    }
}

#[async_trait]
impl Queue for MetricsQueue {
    fn id(&self) -> QueueId {
        self.inner.id()
    }

    fn created(&self) -> DateTime<Utc> {
        self.inner.created()
    }

    fn tags(&self) -> &Tags {
        self.inner.tags()
    }

    fn store(&self) -> Store {
        self.inner.store()
    }

    async fn add(&self, message: Message) -> QueueResult<()> {
        self.inner.add(message).await.map_err(|e| self.failed(e))?;
        self.metrics.enqueued(self.id());
        Ok(())
    }

    async fn pop(&self) -> QueueResult<Message> {
        let message = self.inner.pop().await.map_err(|e| self.failed(e))?;
        self.metrics.consumed(self.id());
        Ok(message)
    }

    async fn peek(&self) -> QueueResult<Message> {
        self.inner.peek().await.map_err(|e| self.failed(e))
    }
}
