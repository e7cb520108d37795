//! Message and metadata model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tags::{Tag, Tags};

/// Message Identifier
pub type MessageId = Uuid;

/// Information associated with either a queue or a message.
///
/// The ID and creation time are fixed when the metadata is created; only the
/// tag set is mutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    id: Uuid,
    created: DateTime<Utc>,
    #[serde(default)]
    tags: Tags,
}

impl Metadata {
    /// Fresh metadata with a new v4 ID, created now, with no tags.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created: Utc::now(),
            tags: Tags::new(),
        }
    }

    pub fn tagged(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut meta = Self::new();
        meta.tags.extend(tags);
        meta
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

/// An entry in a queue: metadata plus an opaque, immutable payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    meta: Metadata,
    payload: Vec<u8>,
}

impl Message {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            meta: Metadata::new(),
            payload: payload.into(),
        }
    }

    /// Apply initial tags to a new message.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.meta.tags.extend(tags);
        self
    }

    pub fn id(&self) -> MessageId {
        self.meta.id
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.meta.created
    }

    pub fn tags(&self) -> &Tags {
        &self.meta.tags
    }

    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_messages_have_distinct_ids() {
        let a = Message::new("salyut");
        let b = Message::new("salyut");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.payload(), b.payload());
    }

    #[test]
    fn test_with_tags() {
        let msg = Message::new("dove 001").with_tags([Tag::new("size", "3U")]);
        assert!(msg.tags().contains("size", "3U"));
        assert_eq!(msg.tags().len(), 1);
    }

    #[test]
    fn test_tags_mutable_after_creation() {
        let msg = Message::new("mir");
        let id = msg.id();
        let created = msg.created();

        msg.tags().add("country", "USSR");

        assert!(msg.tags().contains("country", "USSR"));
        assert_eq!(msg.id(), id);
        assert_eq!(msg.created(), created);
    }

    #[test]
    fn test_metadata_survives_json() {
        let msg = Message::new(vec![0u8, 159, 146, 150])
            .with_tags([Tag::new("country", "USSR"), Tag::new("country", "Russia")]);
        let bytes = serde_json::to_vec(&msg).unwrap();
        let back: Message = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(back, msg);
        assert_eq!(back.created(), msg.created());
    }
}
