use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ContentMapError;

/// What a [`ContentMap`] key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKey {
    /// Bare file name. Every file with that name gets the same content, in
    /// whichever directory it lives.
    #[default]
    Name,
    /// Full archive path including the root, e.g. `my-app/src/main.rs`.
    Path,
}

/// User supplied file contents, consulted when the archive is serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMap {
    pub key: ContentKey,
    pub entries: BTreeMap<String, String>,
}

impl ContentMap {
    pub fn new(key: ContentKey) -> Self {
        Self {
            key,
            entries: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(key.into(), content.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn content_for(&self, name: &str, path: &str) -> Option<&str> {
        match self.key {
            ContentKey::Name => self.get(name),
            ContentKey::Path => self.get(path),
        }
    }

    /// Parses a JSON object of `key -> text`.
    pub fn from_json(key: ContentKey, json: &str) -> Result<Self, ContentMapError> {
        let entries: BTreeMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { key, entries })
    }

    pub fn load(key: ContentKey, path: &Path) -> Result<Self, ContentMapError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContentMapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(key, &json)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
