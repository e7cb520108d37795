//! # fifoq Queue
//!
//! In-process building blocks:
//! - [`MemoryQueue`]: volatile FIFO queue with an optional capacity limit
//! - [`QueueManager`]: concurrent registry of live queues keyed by ID

pub mod manager;
pub mod memory;

pub use manager::QueueManager;
pub use memory::MemoryQueue;
