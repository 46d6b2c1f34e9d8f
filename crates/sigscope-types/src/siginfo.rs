use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::SignatureHash;

/// Locator for one on-disk signature record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SigFileRef(PathBuf);

impl SigFileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for SigFileRef {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl fmt::Display for SigFileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One matching signature record reported by the backend.
///
/// `modified` is only populated when the backend scanned without an explicit
/// hash filter; it is the recency used by most-recent-mode selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigInfoEntry {
    pub hash: SignatureHash,
    pub file: SigFileRef,
    pub modified: Option<DateTime<Utc>>,
}

/// The accumulated result of one `FindSigInfo` command: a mapping from
/// signature hash to record locator.
///
/// Entries keep their insertion order, and inserting an already-present hash
/// replaces the entry in place (last write wins). Insertion order is the
/// documented deterministic tie-break when recency timestamps are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigInfoResult {
    entries: Vec<SigInfoEntry>,
}

impl SigInfoResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any existing entry with the same hash.
    pub fn insert(&mut self, entry: SigInfoEntry) {
        match self.entries.iter_mut().find(|e| e.hash == entry.hash) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Merge another result into this one, last write winning per hash.
    pub fn merge(&mut self, other: SigInfoResult) {
        for entry in other.entries {
            self.insert(entry);
        }
    }

    /// Look up the entry for a hash.
    pub fn get(&self, hash: &SignatureHash) -> Option<&SigInfoEntry> {
        self.entries.iter().find(|e| &e.hash == hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SigInfoEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<SigInfoEntry> for SigInfoResult {
    fn from_iter<I: IntoIterator<Item = SigInfoEntry>>(iter: I) -> Self {
        let mut result = Self::new();
        for entry in iter {
            result.insert(entry);
        }
        result
    }
}
