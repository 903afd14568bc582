//! Checkout planning
//!
//! A migration is computed from two flattened file maps: what the index tracks now and what
//! the target tree holds. Applying it deletes the files the target drops, then writes every
//! file the target adds or changes. Paths both sides agree on are left alone, which is what
//! lets staged work that already matches the target survive a branch switch.

use crate::artifacts::database::database_entry::DatabaseEntry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Flattened `path -> (oid, mode)` view of an index or a tree
pub type FileMap = BTreeMap<PathBuf, DatabaseEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    deletions: BTreeSet<PathBuf>,
    writes: BTreeMap<PathBuf, DatabaseEntry>,
}

impl Migration {
    /// Changes needed to move the working tree from `current` to `target`
    pub fn plan(current: &FileMap, target: &FileMap) -> Self {
        let deletions = current
            .keys()
            .filter(|path| !target.contains_key(*path))
            .cloned()
            .collect();

        let writes = target
            .iter()
            .filter(|(path, entry)| current.get(*path) != Some(entry))
            .map(|(path, entry)| (path.clone(), entry.clone()))
            .collect();

        Migration { deletions, writes }
    }

    /// Like `plan`, but rewrite every target file whatever the working tree holds
    pub fn restore(current: &FileMap, target: &FileMap) -> Self {
        Migration {
            writes: target.clone(),
            ..Self::plan(current, target)
        }
    }

    pub fn deletions(&self) -> impl Iterator<Item = &PathBuf> {
        self.deletions.iter()
    }

    pub fn writes(&self) -> impl Iterator<Item = (&PathBuf, &DatabaseEntry)> {
        self.writes.iter()
    }

    pub fn is_rewritten(&self, path: &std::path::Path) -> bool {
        self.writes.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.writes.is_empty()
    }
}
