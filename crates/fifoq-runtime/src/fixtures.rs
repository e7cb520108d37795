//! Predictable queue and manager fakes for testing decorators

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use fifoq_core::{Manager, Message, Queue, QueueError, QueueId, QueueResult, Store, Tags};

/// ID reported by every [`PredictableQueue`]
pub const PREDICTABLE_QUEUE_ID: QueueId = QueueId::from_u128(0x92082756_edea_48ca_9cf0_870a9b1fa2eb);

/// A queue that always answers with the same message or error.
#[derive(Debug)]
pub struct PredictableQueue {
    result: QueueResult<Message>,
    tags: Tags,
}

impl PredictableQueue {
    pub fn new(result: QueueResult<Message>) -> Self {
        let tags = Tags::new();
        tags.add("log", "captain");
        tags.add("log", "stardate 42073.1");
        Self { result, tags }
    }

    /// A queue whose every call fails with `err`
    pub fn failing(err: QueueError) -> Self {
        Self::new(Err(err))
    }
}

#[async_trait]
impl Queue for PredictableQueue {
    fn id(&self) -> QueueId {
        PREDICTABLE_QUEUE_ID
    }

    fn created(&self) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn store(&self) -> Store {
        Store::Memory
    }

    async fn add(&self, _message: Message) -> QueueResult<()> {
        self.result.clone().map(|_| ())
    }

    async fn pop(&self) -> QueueResult<Message> {
        self.result.clone()
    }

    async fn peek(&self) -> QueueResult<Message> {
        self.result.clone()
    }
}

/// A manager that always answers with the same queue or error.
#[derive(Debug)]
pub struct PredictableManager {
    queue: Arc<dyn Queue>,
    error: Option<QueueError>,
}

impl PredictableManager {
    pub fn new(queue: Arc<dyn Queue>, error: Option<QueueError>) -> Self {
        Self { queue, error }
    }

    fn outcome(&self) -> QueueResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Manager for PredictableManager {
    async fn add(&self, _queue: Arc<dyn Queue>) -> QueueResult<()> {
        self.outcome()
    }

    async fn get(&self, _id: QueueId) -> QueueResult<Arc<dyn Queue>> {
        self.outcome().map(|_| Arc::clone(&self.queue))
    }

    async fn delete(&self, _id: QueueId) -> QueueResult<()> {
        self.outcome()
    }

    async fn list(&self) -> QueueResult<Vec<Arc<dyn Queue>>> {
        self.outcome().map(|_| vec![Arc::clone(&self.queue)])
    }
}
