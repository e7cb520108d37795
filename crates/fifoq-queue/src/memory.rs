//! In-memory FIFO queue
//!
//! Messages are held in insertion order behind a single reader/writer lock.
//! `add` and `pop` take the write lock, `peek` takes the read lock; every
//! critical section is O(1).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::VecDeque;

use fifoq_core::{
    Limit, Message, Metadata, Queue, QueueConfig, QueueError, QueueId, QueueResult, Store, Tags,
};

#[derive(Debug)]
pub struct MemoryQueue {
    meta: Metadata,
    limit: Limit,
    messages: RwLock<VecDeque<Message>>,
}

impl MemoryQueue {
    pub fn new(config: QueueConfig) -> Self {
        let meta = Metadata::tagged(config.tags);
        tracing::debug!(queue_id = %meta.id(), limit = %config.limit, "Created in-memory queue");
        Self {
            meta,
            limit: config.limit,
            messages: RwLock::new(VecDeque::new()),
        }
    }

    /// An unbounded queue with no tags
    pub fn unbounded() -> Self {
        Self::new(QueueConfig::default())
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[async_trait]
impl Queue for MemoryQueue {
    fn id(&self) -> QueueId {
        self.meta.id()
    }

    fn created(&self) -> DateTime<Utc> {
        self.meta.created()
    }

    fn tags(&self) -> &Tags {
        self.meta.tags()
    }

    fn store(&self) -> Store {
        Store::Memory
    }

    async fn add(&self, message: Message) -> QueueResult<()> {
        let mut messages = self.messages.write();
        if let Limit::Bounded(limit) = self.limit {
            if messages.len() as u64 >= limit {
                return Err(QueueError::full(self.id(), limit));
            }
        }
        messages.push_back(message);
        Ok(())
    }

    async fn pop(&self) -> QueueResult<Message> {
        self.messages
            .write()
            .pop_front()
            .ok_or_else(|| QueueError::empty(self.id()))
    }

    async fn peek(&self) -> QueueResult<Message> {
        self.messages
            .read()
            .front()
            .cloned()
            .ok_or_else(|| QueueError::empty(self.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fifoq_core::Tag;

    fn messages(payloads: &[&str]) -> Vec<Message> {
        payloads.iter().map(|p| Message::new(*p)).collect()
    }

    #[tokio::test]
    async fn test_add_pop_in_order() {
        let queue = MemoryQueue::unbounded();
        let msgs = messages(&["salyut", "DOS", "kosmos", "skylab", "mir", "iss", "tiangong"]);

        for msg in &msgs {
            queue.add(msg.clone()).await.unwrap();
        }
        assert_eq!(queue.len(), msgs.len());

        for want in &msgs {
            let got = queue.pop().await.unwrap();
            assert_eq!(&got, want);
        }
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_limit_scenario() {
        let queue = MemoryQueue::new(QueueConfig::bounded(2));

        queue.add(Message::new("a")).await.unwrap();
        queue.add(Message::new("b")).await.unwrap();
        let err = queue.add(Message::new("c")).await.unwrap_err();
        assert!(err.is_full(), "{err}");
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop().await.unwrap().payload(), b"a");
        queue.add(Message::new("c")).await.unwrap();
        assert_eq!(queue.pop().await.unwrap().payload(), b"b");
        assert_eq!(queue.pop().await.unwrap().payload(), b"c");
        assert!(queue.pop().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_zero_limit_rejects_everything() {
        let queue = MemoryQueue::new(QueueConfig::bounded(0));
        assert!(queue.add(Message::new("x")).await.unwrap_err().is_full());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_peek_is_non_destructive() {
        let queue = MemoryQueue::unbounded();
        queue.add(Message::new("first")).await.unwrap();
        queue.add(Message::new("second")).await.unwrap();

        let peeked = queue.peek().await.unwrap();
        assert_eq!(queue.peek().await.unwrap(), peeked);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop().await.unwrap(), peeked);
        assert_eq!(queue.peek().await.unwrap().payload(), b"second");
    }

    #[tokio::test]
    async fn test_empty_queue() {
        let queue = MemoryQueue::unbounded();
        assert!(queue.pop().await.unwrap_err().is_not_found());
        assert!(queue.peek().await.unwrap_err().is_not_found());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_metadata() {
        let queue = MemoryQueue::new(QueueConfig::default().with_tag("position", "CAPCOM"));
        assert_eq!(queue.store(), Store::Memory);
        assert!(queue.tags().contains("position", "CAPCOM"));
        assert_eq!(queue.limit(), Limit::Unbounded);

        queue.tags().add_tag(Tag::new("position", "FLIGHT"));
        assert_eq!(queue.tags().len(), 2);
        assert!(queue.created() <= Utc::now());
    }
}
