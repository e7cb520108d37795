//! Metrics sink contract
//!
//! Only counters are exposed, never gauges: counts keep their meaning when a
//! time series is downsampled.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::ErrorKind;
use crate::queue::QueueId;

/// Receives queue events from the metrics decorator.
pub trait Metrics: Send + Sync + Debug {
    /// A message was added to the queue
    fn enqueued(&self, id: QueueId);

    /// A message was popped from the queue
    fn consumed(&self, id: QueueId);

    /// An add, pop or peek failed
    fn error(&self, id: QueueId, kind: ErrorKind);
}

/// Metrics implementation that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopMetrics;

impl Metrics for NopMetrics {
    fn enqueued(&self, _id: QueueId) {}
    fn consumed(&self, _id: QueueId) {}
    fn error(&self, _id: QueueId, _kind: ErrorKind) {}
}

/// Counters for a single queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounters {
    pub enqueued: u64,
    pub consumed: u64,
    pub errors: HashMap<ErrorKind, u64>,
}

impl QueueCounters {
    pub fn errors_of(&self, kind: ErrorKind) -> u64 {
        self.errors.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_errors(&self) -> u64 {
        self.errors.values().sum()
    }
}

/// In-process per-queue counters.
#[derive(Debug, Default)]
pub struct CounterMetrics {
    queues: RwLock<HashMap<QueueId, QueueCounters>>,
}

impl CounterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters for a queue; all zero if it was never observed.
    pub fn snapshot(&self, id: QueueId) -> QueueCounters {
        self.queues.read().get(&id).cloned().unwrap_or_default()
    }

    /// IDs of every queue observed so far
    pub fn queue_ids(&self) -> Vec<QueueId> {
        self.queues.read().keys().copied().collect()
    }
}

impl Metrics for CounterMetrics {
    fn enqueued(&self, id: QueueId) {
        self.queues.write().entry(id).or_default().enqueued += 1;
    }

    fn consumed(&self, id: QueueId) {
        self.queues.write().entry(id).or_default().consumed += 1;
    }

    fn error(&self, id: QueueId, kind: ErrorKind) {
        *self
            .queues
            .write()
            .entry(id)
            .or_default()
            .errors
            .entry(kind)
            .or_insert(0) += 1;
    }
}
