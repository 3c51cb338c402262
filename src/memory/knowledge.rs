use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StoreError;

/// File-backed query -> answer cache used by the response resolver.
///
/// Serialized as one flat JSON object, loaded whole and rewritten whole.
/// Entries never expire; re-resolving a key overwrites it.
#[derive(Debug)]
pub struct KnowledgeStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl KnowledgeStore {
    /// Opens the store, treating a missing or unreadable file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Knowledge store unreadable, starting empty");
                HashMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "Knowledge store loaded");
        Self { path, entries }
    }

    fn read(path: &Path) -> Result<HashMap<String, String>, StoreError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn get(&self, query: &str) -> Option<&str> {
        self.entries.get(query).map(String::as_str)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    /// Inserts in memory only; call `save` to persist.
    pub fn insert(&mut self, query: impl Into<String>, answer: impl Into<String>) {
        self.entries.insert(query.into(), answer.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
