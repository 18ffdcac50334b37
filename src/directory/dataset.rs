//! Read-only catalog backing the topic directory.
//!
//! Entries are keyed by their catalog number. Numbers need not be dense: a
//! dataset may skip numbers, and sampling a skipped number yields a gap.

use std::collections::BTreeMap;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::error::DatasetError;

const BUNDLED: &str = include_str!("../../data/pokedex.json");

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub num: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// An entry whose type matched a search, with the type that matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMatch<'a> {
    #[serde(rename = "type")]
    pub matched: &'a str,
    pub num: u32,
    pub name: &'a str,
}

/// Search hits grouped by the field that matched. An entry can show up in
/// both groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults<'a> {
    pub by_name: Vec<&'a Entry>,
    pub by_type: Vec<TypeMatch<'a>>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_type.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entries: BTreeMap<u32, Entry>,
}

impl Dataset {
    /// Builds a dataset from entries. A later entry with the same number
    /// replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Result<Self, DatasetError> {
        let mut map = BTreeMap::new();
        for entry in entries {
            if entry.num == 0 {
                return Err(DatasetError::ZeroNumber { name: entry.name });
            }
            map.insert(entry.num, entry);
        }
        Ok(Self { entries: map })
    }

    /// Parses a JSON array of entries.
    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        let entries: Vec<Entry> = serde_json::from_str(text)?;
        Self::from_entries(entries)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Loads `path` when given, the bundled catalog otherwise.
    pub fn load_or_bundled(path: Option<&str>) -> Result<Self, DatasetError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    /// The 151-entry catalog shipped with the crate.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json(BUNDLED)
    }

    pub fn lookup(&self, num: u32) -> Option<&Entry> {
        self.entries.get(&num)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Highest catalog number, or 0 for an empty dataset.
    pub fn max_id(&self) -> u32 {
        self.entries.last_key_value().map_or(0, |(num, _)| *num)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Samples a number uniformly in `1..=max_id`. Returns `None` when the
    /// sampled number is a gap or the dataset is empty.
    pub fn random_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Entry> {
        let max = self.max_id();
        if max == 0 {
            return None;
        }
        self.lookup(rng.random_range(1..=max))
    }

    /// Case-insensitive substring search over names and types, in catalog
    /// order. For an entry with several matching types the first one is
    /// reported.
    pub fn search(&self, query: &str) -> SearchResults<'_> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults::default();
        }

        let mut results = SearchResults::default();
        for entry in self.entries.values() {
            if contains_ignore_case(&entry.name, &needle) {
                results.by_name.push(entry);
            }
            if let Some(matched) = entry
                .types
                .iter()
                .find(|t| contains_ignore_case(t, &needle))
            {
                results.by_type.push(TypeMatch {
                    matched,
                    num: entry.num,
                    name: &entry.name,
                });
            }
        }
        results
    }
}

/// `needle` must already be lowercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
