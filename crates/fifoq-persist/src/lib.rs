//! # fifoq Persistence
//!
//! Durable FIFO queues stored in SQLite.
//!
//! A [`SqliteStore`] owns the connection pool and creates or reopens
//! [`SqliteQueue`]s; many queues share one database.

pub mod queue;
pub mod sqlite;

pub use queue::SqliteQueue;
pub use sqlite::{SqliteConfig, SqliteStore};
