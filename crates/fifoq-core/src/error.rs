//! Queue error taxonomy
//!
//! Every failure surfaced by a queue, a manager, or a decorator is one of four
//! kinds. Backends classify at the point of origin; callers and decorators
//! classify with the predicates below and never look at the message text.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// A queue has reached its capacity limit.
    #[error("Full: {0}")]
    Full(String),

    /// A queue or message does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed caller input.
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Anything else, including storage engine faults.
    #[error("Unknown: {0}")]
    Unknown(String),
}

impl QueueError {
    pub fn full(queue: Uuid, limit: u64) -> Self {
        Self::Full(format!(
            "queue {} has reached limit of {} messages",
            queue, limit
        ))
    }

    pub fn empty(queue: Uuid) -> Self {
        Self::NotFound(format!("queue {} is empty", queue))
    }

    /// Wrap an underlying fault as `Unknown`, prefixed with what was being attempted.
    pub fn unknown(context: impl fmt::Display, source: impl fmt::Display) -> Self {
        Self::Unknown(format!("{}: {}", context, source))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Full(_) => ErrorKind::Full,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Invalid(_) => ErrorKind::Invalid,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Classification of a [`QueueError`], used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unknown,
    Full,
    NotFound,
    Invalid,
}

impl ErrorKind {
    /// Collapse a kind to the labels reported by metrics sinks.
    /// Only `Full` and `NotFound` are distinguished; everything else is `Unknown`.
    pub fn metric_label(err: &QueueError) -> Self {
        if err.is_full() {
            Self::Full
        } else if err.is_not_found() {
            Self::NotFound
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Full => "full",
            Self::NotFound => "not_found",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse caller-supplied text into a queue or message identifier.
pub fn parse_id(id: &str) -> QueueResult<Uuid> {
    Uuid::parse_str(id)
        .map_err(|e| QueueError::Invalid(format!("cannot parse ID {} as a UUID: {}", id, e)))
}
