//! Linked file store for a trial.
//!
//! Maps artifact keys ("c3d", "trc", "ik_results", ...) to absolute paths.
//! Entries keep insertion order and are never removed; linking an existing
//! key replaces its path.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Artifact key to path links, in the order they were first made.
///
/// A trial rarely links more than a handful of outputs, so entries live
/// inline in a SmallVec.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LinkedFiles {
    entries: SmallVec<[(String, String); 4]>,
}

impl LinkedFiles {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `path` under `key`, replacing the path of a key already linked.
    pub fn set(&mut self, key: impl Into<String>, path: impl Into<String>) {
        let key = key.into();
        match self.slot(&key) {
            Some(i) => self.entries[i].1 = path.into(),
            None => self.entries.push((key, path.into())),
        }
    }

    /// Path linked under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slot(key).map(|i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slot(key).is_some()
    }

    fn slot(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(linked, _)| linked == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key-path pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Debug for LinkedFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LinkedFiles {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut files = Self::new();
        for (k, v) in iter {
            files.set(k, v);
        }
        files
    }
}

impl Serialize for LinkedFiles {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LinkedFiles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinkedFilesVisitor;

        impl<'de> Visitor<'de> for LinkedFilesVisitor {
            type Value = LinkedFiles;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of file keys to paths")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<LinkedFiles, A::Error> {
                let mut files = LinkedFiles::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    files.set(k, v);
                }
                Ok(files)
            }
        }

        deserializer.deserialize_map(LinkedFilesVisitor)
    }
}
