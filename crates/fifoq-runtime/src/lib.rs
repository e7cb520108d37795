//! # fifoq Runtime
//!
//! Cross-cutting instrumentation for queues and managers:
//! - [`LoggingQueue`] / [`LoggingManager`]: structured `tracing` events per call
//! - [`MetricsQueue`]: enqueued / consumed / error counters
//! - [`InstrumentedManager`]: wraps every registered queue in metrics then logging
//! - [`RecorderMetrics`]: [`Metrics`](fifoq_core::Metrics) sink over the `metrics` facade
//! - [`DefaultFactory`]: builds memory or SQLite queues
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fifoq_core::{Manager, Message, QueueConfig, Store, Factory};
//! use fifoq_queue::QueueManager;
//! use fifoq_runtime::{DefaultFactory, InstrumentedManager, RecorderMetrics};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = InstrumentedManager::new(
//!         Arc::new(QueueManager::new()),
//!         Arc::new(RecorderMetrics::new()),
//!     );
//!
//!     let queue = DefaultFactory::new()
//!         .create(Store::Memory, QueueConfig::bounded(100))
//!         .await?;
//!     let id = queue.id();
//!     manager.add(queue).await?;
//!
//!     let queue = manager.get(id).await?;
//!     queue.add(Message::new("hello")).await?;
//!     println!("{:?}", queue.pop().await?.payload());
//!     Ok(())
//! }
//! ```

pub mod factory;
pub mod fixtures;
pub mod instrumented;
pub mod logging;
pub mod metrics;
pub mod recorder;
pub mod telemetry;

pub use factory::DefaultFactory;
pub use instrumented::InstrumentedManager;
pub use logging::{LoggingManager, LoggingQueue};
pub use metrics::MetricsQueue;
pub use recorder::RecorderMetrics;
pub use telemetry::{init_tracing, TelemetryConfig, TelemetryError};
