//! Metrics sink backed by the `metrics` crate facade
//!
//! Counters land in whatever recorder the process installs; with none
//! installed every call is a no-op.

use fifoq_core::{ErrorKind, Metrics, QueueId};

pub const ENQUEUED_TOTAL: &str = "queue_messages_enqueued_total";
pub const CONSUMED_TOTAL: &str = "queue_messages_consumed_total";
pub const ERRORS_TOTAL: &str = "queue_errors_total";

#[derive(Debug, Default, Clone, Copy)]
pub struct RecorderMetrics;

impl RecorderMetrics {
    /// Create the sink and register counter descriptions with the installed recorder.
    pub fn new() -> Self {
        ::metrics::describe_counter!(ENQUEUED_TOTAL, "Number of queued messages.");
        ::metrics::describe_counter!(CONSUMED_TOTAL, "Number of consumed messages.");
        ::metrics::describe_counter!(
            ERRORS_TOTAL,
            "Number of errors encountered while enqueuing or consuming messages."
        );
        Self
    }
}

impl Metrics for RecorderMetrics {
    fn enqueued(&self, id: QueueId) {
        ::metrics::counter!(ENQUEUED_TOTAL, "queue" => id.to_string()).increment(1);
    }

    fn consumed(&self, id: QueueId) {
        ::metrics::counter!(CONSUMED_TOTAL, "queue" => id.to_string()).increment(1);
    }

    fn error(&self, id: QueueId, kind: ErrorKind) {
        ::metrics::counter!(ERRORS_TOTAL, "queue" => id.to_string(), "type" => kind.as_str())
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsQueue;
    use fifoq_core::{Message, Queue, QueueConfig};
    use fifoq_queue::MemoryQueue;
    use std::sync::Arc;

    // No recorder is installed in tests, so this only checks the sink is inert.
    #[tokio::test]
    async fn test_without_recorder_is_noop() {
        let queue = MetricsQueue::new(
            Arc::new(MemoryQueue::new(QueueConfig::bounded(1))),
            Arc::new(RecorderMetrics::new()),
        );
        queue.add(Message::new("x")).await.unwrap();
        assert!(queue.add(Message::new("y")).await.unwrap_err().is_full());
        assert_eq!(queue.pop().await.unwrap().payload(), b"x");
        assert!(queue.peek().await.unwrap_err().is_not_found());
    }
}
