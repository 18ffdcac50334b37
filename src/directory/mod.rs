//! Topic directory
//!
//! Validates topic identifiers against the catalog and derives display
//! identities for new connections. Every catalog number is a topic and
//! every topic has exactly one chat room.

pub mod dataset;
pub mod natures;

use std::fmt;

use rand::Rng;

use crate::utils::error::DirectoryError;
pub use dataset::{Dataset, Entry, SearchResults, TypeMatch};

/// Sampling attempts before falling back to a present entry.
const GAP_RETRIES: usize = 32;

/// A 1-based topic identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicId(u32);

impl TopicId {
    pub const fn new(id: u32) -> Option<Self> {
        if id == 0 { None } else { Some(Self(id)) }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based room slot.
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
pub struct TopicDirectory {
    dataset: Dataset,
    names: Vec<String>,
}

impl TopicDirectory {
    /// Fails when the dataset is empty: no identity could ever be derived.
    pub fn new(dataset: Dataset) -> Result<Self, DirectoryError> {
        let names: Vec<String> = dataset.entries().map(|e| e.name.clone()).collect();
        if names.is_empty() {
            return Err(DirectoryError::EmptyDataset);
        }
        Ok(Self { dataset, names })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn max_topic_id(&self) -> u32 {
        self.dataset.max_id()
    }

    /// Returns the topic for a raw wire id if the catalog has an entry there.
    pub fn resolve(&self, raw: i64) -> Option<TopicId> {
        let id = u32::try_from(raw).ok()?;
        self.dataset.lookup(id)?;
        TopicId::new(id)
    }

    pub fn validate(&self, raw: i64) -> bool {
        self.resolve(raw).is_some()
    }

    pub fn label(&self, topic: TopicId) -> Option<&str> {
        self.dataset.lookup(topic.get()).map(|e| e.name.as_str())
    }

    pub fn random_identity(&self) -> String {
        self.random_identity_with(&mut rand::rng())
    }

    /// `"<catalog name> <nature>"`. Gaps in the catalog are resampled; after
    /// `GAP_RETRIES` misses a present entry is chosen directly.
    pub fn random_identity_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut name = None;
        for _ in 0..GAP_RETRIES {
            if let Some(entry) = self.dataset.random_entry(rng) {
                name = Some(entry.name.as_str());
                break;
            }
        }
        let name = match name {
            Some(name) => name,
            None => self.names[rng.random_range(0..self.names.len())].as_str(),
        };
        format!("{} {}", name, natures::random_nature(rng))
    }
}

#[cfg(test)]
mod tests;
