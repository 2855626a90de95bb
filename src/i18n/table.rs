//! Language table: one language's key/value entries.
//!
//! Entries keep the order they were authored in. Lookups go through a map
//! keyed by the normalized (lower-cased) key, which is always the fold of the
//! entry list with last-write-wins on collisions.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single translation entry as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub key: String,
    pub value: String,
}

impl LanguageEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// On-disk shape of a language file: `{ "entries": [...] }`
#[derive(Debug, Default, Serialize, Deserialize)]
struct TableFile {
    #[serde(default)]
    entries: Vec<LanguageEntry>,
}

/// Normalize a translation key for comparison.
///
/// Folds one character at a time with Unicode default lower-casing, so the
/// result never depends on the process locale or on a character's position
/// in the word. Final sigma folds to `σ` like capital sigma does.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

/// In-memory table for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageTable {
    entries: Vec<LanguageEntry>,
    index: HashMap<String, String>,
}

impl LanguageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an ordered entry list.
    ///
    /// Duplicate keys (after normalization) all stay in the entry list; the
    /// later one wins in lookups.
    pub fn from_entries(entries: Vec<LanguageEntry>) -> Self {
        let mut table = Self {
            entries,
            index: HashMap::new(),
        };
        table.rebuild_index();
        table
    }

    /// Parse a language file.
    ///
    /// # Errors
    /// Returns `CatalogError::Parse` if `json` is not a valid table document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TableFile =
            serde_json::from_str(json).map_err(|e| CatalogError::parse("language table", e))?;
        Ok(Self::from_entries(file.entries))
    }

    /// Serialize the entry list, in order, as a pretty-printed language file.
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        struct TableFileRef<'a> {
            entries: &'a [LanguageEntry],
        }

        // Serializing plain strings cannot fail
        serde_json::to_string_pretty(&TableFileRef {
            entries: &self.entries,
        })
        .unwrap_or_default()
    }

    /// Look up a key case-insensitively.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.index.get(&normalize_key(key)).map(String::as_str)
    }

    /// Check whether a key is present (case-insensitive).
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&normalize_key(key))
    }

    /// Insert or update a key.
    ///
    /// If the key already exists, the last matching entry gets the new value
    /// and keeps its original spelling. Otherwise a new entry is appended.
    pub fn put(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let normalized = normalize_key(key);

        match self
            .entries
            .iter_mut()
            .rev()
            .find(|entry| normalize_key(&entry.key) == normalized)
        {
            Some(entry) => entry.value = value.clone(),
            None => self.entries.push(LanguageEntry::new(key, value.clone())),
        }

        self.index.insert(normalized, value);
    }

    /// Remove every entry matching `key`. Returns `true` if anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let normalized = normalize_key(key);
        let before = self.entries.len();
        self.entries.retain(|entry| normalize_key(&entry.key) != normalized);
        self.index.remove(&normalized);
        self.entries.len() != before
    }

    /// Entries in authoring order.
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct keys in first-seen order, with their original spelling.
    pub fn keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| seen.insert(normalize_key(&entry.key)))
            .map(|entry| entry.key.as_str())
            .collect()
    }

    /// Normalized keys that appear more than once in the entry list.
    pub fn duplicate_keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            let normalized = normalize_key(&entry.key);
            if !seen.insert(normalized.clone()) && !duplicates.contains(&normalized) {
                duplicates.push(normalized);
            }
        }
        duplicates
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .map(|entry| (normalize_key(&entry.key), entry.value.clone()))
            .collect();
    }
}
