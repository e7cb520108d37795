//! # fifoq Core
//!
//! Core types for fifoq:
//! - [`Tags`]: Concurrent set of key:value annotations
//! - [`Message`] / [`Metadata`]: The values a queue stores and returns
//! - [`Queue`], [`Manager`], [`Factory`]: Contracts every backend and decorator satisfies
//! - [`Metrics`]: Sink for queue events
//! - [`QueueError`]: The four-kind error taxonomy

pub mod config;
pub mod error;
pub mod message;
pub mod metrics;
pub mod queue;
pub mod tags;

pub use config::{Limit, QueueConfig};
pub use error::{parse_id, ErrorKind, QueueError, QueueResult};
pub use message::{Message, MessageId, Metadata};
pub use metrics::{CounterMetrics, Metrics, NopMetrics, QueueCounters};
pub use queue::{Factory, Manager, Queue, QueueId, Store};
pub use tags::{Tag, Tags};
