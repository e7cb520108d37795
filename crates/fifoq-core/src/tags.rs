//! Concurrent tag sets
//!
//! A [`Tags`] set holds arbitrary `key:value` annotations. A single key may
//! carry several values at once, so membership is by exact pair rather than by
//! key. Storage is allocated on the first insert; an untouched set answers
//! every query as empty.

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

/// An arbitrary key:value pair associated with a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.value)
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Tag {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A threadsafe set of tags.
#[derive(Default)]
pub struct Tags {
    inner: OnceLock<RwLock<HashSet<Tag>>>,
}

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> &RwLock<HashSet<Tag>> {
        self.inner.get_or_init(|| RwLock::new(HashSet::new()))
    }

    /// Unordered snapshot of every tag in the set.
    pub fn get(&self) -> Vec<Tag> {
        match self.inner.get() {
            Some(tags) => tags.read().iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.contains_tag(&Tag::new(key, value))
    }

    pub fn contains_tag(&self, tag: &Tag) -> bool {
        self.inner
            .get()
            .is_some_and(|tags| tags.read().contains(tag))
    }

    /// Insert a pair. Inserting a pair that is already present is a no-op.
    pub fn add(&self, key: impl Into<String>, value: impl Into<String>) {
        self.add_tag(Tag::new(key, value));
    }

    pub fn add_tag(&self, tag: Tag) {
        self.storage().write().insert(tag);
    }

    /// Insert every key:value pair of a map.
    pub fn add_map(&self, map: &HashMap<String, String>) {
        let mut tags = self.storage().write();
        for (key, value) in map {
            tags.insert(Tag::new(key.clone(), value.clone()));
        }
    }

    /// Remove a pair. Removing an absent pair is a no-op.
    pub fn remove(&self, key: &str, value: &str) {
        self.remove_tag(&Tag::new(key, value));
    }

    pub fn remove_tag(&self, tag: &Tag) {
        if let Some(tags) = self.inner.get() {
            tags.write().remove(tag);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.get().map_or(0, |tags| tags.read().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for Tags {
    fn clone(&self) -> Self {
        self.get().into_iter().collect()
    }
}

/// Two sets are equal when they hold the same pairs.
impl PartialEq for Tags {
    fn eq(&self, other: &Self) -> bool {
        let ours: HashSet<Tag> = self.get().into_iter().collect();
        let theirs: HashSet<Tag> = other.get().into_iter().collect();
        ours == theirs
    }
}

impl Eq for Tags {}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags = self.get();
        tags.sort();
        f.debug_set().entries(tags.iter().map(|t| t.to_string())).finish()
    }
}

impl Extend<Tag> for Tags {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        let mut tags = self.storage().write();
        tags.extend(iter);
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut tags = Tags::new();
        tags.extend(iter);
        tags
    }
}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tags = self.get();
        tags.sort();
        tags.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tags = Vec::<Tag>::deserialize(deserializer)?;
        Ok(tags.into_iter().collect())
    }
}
