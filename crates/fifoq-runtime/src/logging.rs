//! Logging decorators for queues and managers
//!
//! Each wrapper forwards every call unchanged and emits one `tracing` event
//! per operation: `debug!` on success, `error!` on failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info_span, Instrument, Span};

use fifoq_core::{Manager, Message, Queue, QueueId, QueueResult, Store, Tags};

/// Wraps a queue with structured logging.
#[derive(Debug)]
pub struct LoggingQueue {
    inner: Arc<dyn Queue>,
    span: Span,
}

impl LoggingQueue {
    pub fn new(inner: Arc<dyn Queue>) -> Self {
        let span = info_span!("queue", queue_id = %inner.id(), store = %inner.store());
        span.in_scope(|| debug!("queue logging enabled"));
        Self { inner, span }
    }
}

#[async_trait]
impl Queue for LoggingQueue {
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
        let message_id = message.id();
        async {
            match self.inner.add(message).await {
                Ok(()) => {
                    debug!(message_id = %message_id, "add");
                    Ok(())
                }
                Err(e) => {
                    error!(message_id = %message_id, error = %e, "add");
                    Err(e)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    async fn pop(&self) -> QueueResult<Message> {
        async {
            let result = self.inner.pop().await;
            match &result {
                Ok(m) => debug!(message_id = %m.id(), "pop"),
                Err(e) => error!(error = %e, "pop"),
            }
            result
        }
        .instrument(self.span.clone())
        .await
    }

    async fn peek(&self) -> QueueResult<Message> {
        async {
            let result = self.inner.peek().await;
            match &result {
                Ok(m) => debug!(message_id = %m.id(), "peek"),
                Err(e) => error!(error = %e, "peek"),
            }
            result
        }
        .instrument(self.span.clone())
        .await
    }
}

/// Wraps a queue manager with structured logging.
#[derive(Debug)]
pub struct LoggingManager {
    inner: Arc<dyn Manager>,
}

impl LoggingManager {
    pub fn new(inner: Arc<dyn Manager>) -> Self {
        debug!("queue manager logging enabled");
        Self { inner }
    }
}

#[async_trait]
impl Manager for LoggingManager {
    async fn add(&self, queue: Arc<dyn Queue>) -> QueueResult<()> {
        let id = queue.id();
        let created = queue.created();
        let mut tags: Vec<String> = queue.tags().get().iter().map(|t| t.to_string()).collect();
        tags.sort();

        if let Err(e) = self.inner.add(queue).await {
            error!(queue_id = %id, error = %e, "add queue");
            return Err(e);
        }
        debug!(
            queue_id = %id,
            created = %created,
            tags = %tags.join(","),
            "add queue"
        );
        Ok(())
    }

    async fn get(&self, id: QueueId) -> QueueResult<Arc<dyn Queue>> {
        let result = self.inner.get(id).await;
        match &result {
            Ok(_) => debug!(queue_id = %id, "get queue"),
            Err(e) => error!(queue_id = %id, error = %e, "get queue"),
        }
        result
    }

    async fn delete(&self, id: QueueId) -> QueueResult<()> {
        let result = self.inner.delete(id).await;
        match &result {
            Ok(()) => debug!(queue_id = %id, "delete queue"),
            Err(e) => error!(queue_id = %id, error = %e, "delete queue"),
        }
        result
    }

    async fn list(&self) -> QueueResult<Vec<Arc<dyn Queue>>> {
        let result = self.inner.list().await;
        match &result {
            Ok(queues) => debug!(count = queues.len(), "list queues"),
            Err(e) => error!(error = %e, "list queues"),
        }
        result
    }
}
