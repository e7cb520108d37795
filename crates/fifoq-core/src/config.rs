//! Queue construction options

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QueueError, QueueResult};
use crate::tags::Tag;

/// Maximum number of messages a queue may hold.
///
/// Serialized as a signed integer where `-1` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Limit {
    /// Accept messages until available resources are exhausted.
    #[default]
    Unbounded,
    Bounded(u64),
}

impl Limit {
    /// Raw value of the unbounded sentinel.
    pub const UNBOUNDED: i64 = -1;

    /// Whether a queue currently holding `length` messages must reject another.
    pub fn is_reached(&self, length: u64) -> bool {
        match self {
            Self::Unbounded => false,
            Self::Bounded(limit) => length >= *limit,
        }
    }

    /// 8-byte big-endian encoding, `-1` for unbounded.
    pub fn to_be_bytes(self) -> [u8; 8] {
        i64::from(self).to_be_bytes()
    }

    pub fn from_be_bytes(bytes: &[u8]) -> QueueResult<Self> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| {
            QueueError::Invalid(format!("limit must be 8 bytes, got {}", bytes.len()))
        })?;
        Self::try_from(i64::from_be_bytes(raw))
    }
}

impl TryFrom<i64> for Limit {
    type Error = QueueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            Self::UNBOUNDED => Ok(Self::Unbounded),
            n if n >= 0 => Ok(Self::Bounded(n as u64)),
            n => Err(QueueError::Invalid(format!(
                "limit must be -1 (unbounded) or non-negative, got {}",
                n
            ))),
        }
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Unbounded => Limit::UNBOUNDED,
            Limit::Bounded(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded(n) => write!(f, "{}", n),
        }
    }
}

/// Options for a new queue, shared by every backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Capacity limit (default: unbounded)
    pub limit: Limit,
    /// Tags applied to the new queue (default: none)
    pub tags: Vec<Tag>,
}

impl QueueConfig {
    pub fn bounded(limit: u64) -> Self {
        Self {
            limit: Limit::Bounded(limit),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }
}
