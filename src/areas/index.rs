//! Index (staging area)
//!
//! A flat, path-keyed map of what the next commit will contain. Commands load it once at
//! the start, work on the in-memory copy and save it only after every object they wrote
//! is in the store.
//!
//! ## Locking
//!
//! The file is read under a shared `file-guard` lock. Saving writes `index.lock` under an
//! exclusive lock and renames it over the index, so readers only ever see a complete file.
//! This is not a protocol for concurrent commands, which are not supported.
//!
//! ## Data Structures
//!
//! - `entries`: tracked files by path
//! - `children`: every tracked directory mapped to the files below it, so that staging a file
//!   over a directory (or the other way round) can evict the conflicting entries

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_BLOCK, ENTRY_MIN_SIZE, EntryMetadata, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::HEADER_SIZE;
use crate::errors::RepoError;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const LOCK_EXTENSION: &str = "lock";

#[derive(Debug, Clone)]
pub struct Index {
    path: Box<Path>,
    entries: BTreeMap<PathBuf, IndexEntry>,
    children: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    changed: bool,
}

impl Index {
    /// An empty index that will be saved to `path`
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            changed: false,
        }
    }

    /// Read the index from disk; a missing or empty file is an empty index
    pub fn load(path: Box<Path>) -> anyhow::Result<Self> {
        let mut index = Index::new(path);
        if !index.path.exists() {
            return Ok(index);
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&index.path)
            .with_context(|| format!("unable to open index {}", index.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(index);
        }

        let mut reader = Checksum::new(lock);
        let header = IndexHeader::deserialize(&reader.read(HEADER_SIZE)?)?;
        index.parse_entries(header.entries_count, &mut reader)?;
        reader.verify()?;

        debug!(entries = index.entries.len(), "loaded index");
        Ok(index)
    }

    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let mut entry_bytes = reader.read(ENTRY_MIN_SIZE)?.to_vec();

            while entry_bytes.last() != Some(&0) {
                entry_bytes.extend_from_slice(&reader.read(ENTRY_BLOCK)?);
            }

            let entry = IndexEntry::deserialize(&entry_bytes)?;
            self.store_entry(entry);
        }

        Ok(())
    }

    /// Write the index back if anything changed since it was loaded
    ///
    /// The new content goes to `index.lock` and is renamed over the index once complete, so a
    /// crash mid-write leaves the previous index intact.
    pub fn save(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let lock_path = self.lock_path();
        let written = self
            .write_lock_file(&lock_path)
            .and_then(|_| {
                std::fs::rename(&lock_path, &self.path)
                    .with_context(|| format!("unable to replace index {}", self.path.display()))
            });

        if written.is_err()
            && let Err(e) = std::fs::remove_file(&lock_path)
        {
            warn!(path = %lock_path.display(), error = %e, "unable to remove index lock");
        }
        written?;
        self.changed = false;

        debug!(entries = self.entries.len(), "saved index");
        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension(LOCK_EXTENSION)
    }

    fn write_lock_file(&self, lock_path: &Path) -> anyhow::Result<()> {
        // a lock file left behind by a crashed process is simply overwritten
        let mut lock_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .with_context(|| format!("unable to open index lock {}", lock_path.display()))?;

        {
            let mut lock = file_guard::lock(&mut lock_file, file_guard::Lock::Exclusive, 0, 1)?;
            lock.deref_mut().set_len(0)?;

            let mut writer = Checksum::new(lock);
            let header = IndexHeader {
                entries_count: self.entries.len() as u32,
                ..IndexHeader::empty()
            };
            writer.write(&header.serialize()?)?;

            for entry in self.entries() {
                writer.write(&entry.serialize()?)?;
            }

            writer.write_checksum()?;
        }

        lock_file
            .sync_all()
            .with_context(|| format!("unable to sync index lock {}", lock_path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// A path is tracked directly when it is a file entry or a directory holding one
    pub fn is_directly_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    /// Record a file, replacing any entry for the same path (last write wins)
    ///
    /// Entries that can no longer coexist with it are dropped: a file where one of its
    /// parent directories should be, or the contents of a directory it replaces.
    pub fn stage(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.name);

        self.store_entry(entry);
        self.changed = true;
    }

    /// Stop tracking a file, or every file below a directory
    pub fn unstage(&mut self, path: &Path) -> anyhow::Result<()> {
        if !self.is_directly_tracked(path) {
            return Err(RepoError::PathNotTracked(path.to_path_buf()).into());
        }

        self.remove_entry(path);
        self.remove_children(path);
        self.changed = true;

        Ok(())
    }

    /// Drop every entry, as done before rebuilding the index from a tree
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = true;
    }

    pub fn update_entry_stat(&mut self, path: &Path, stat: EntryMetadata) {
        if let Some(entry) = self.entries.get_mut(path)
            && entry.metadata != stat
        {
            entry.metadata = stat;
            self.changed = true;
        }
    }

    /// Entries in path order
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked files equal to or below `path`
    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|entry_path| path.as_os_str().is_empty() || entry_path.starts_with(path))
            .cloned()
            .collect()
    }

    fn store_entry(&mut self, entry: IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_path_buf())
                .or_default()
                .insert(entry.name.clone());
        }

        self.entries.insert(entry.name.clone(), entry);
    }

    fn remove_children(&mut self, path: &Path) {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &Path) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };

        for parent in entry.parent_dirs() {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
    }
}
