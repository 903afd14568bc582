//! Checkout safety check
//!
//! A checkout may only touch paths whose working copy is disposable. A tracked path is in
//! the way when it carries uncommitted work (staged or unstaged) and the target would
//! replace that work. An untracked file is in the way when the target writes over it or
//! needs a directory where it sits; an untracked directory is in the way when the target
//! writes a file over it and it holds untracked files.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::FileMap;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use crate::errors::RepoError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConflictType {
    /// Tracked file with local changes the target would replace
    StaleFile,
    /// Directory holding untracked files where the target puts a file
    StaleDirectory,
    /// Untracked file the target would overwrite or turn into a directory
    UntrackedOverwritten,
}

impl ConflictType {
    pub fn describe(&self) -> &'static str {
        match self {
            ConflictType::StaleFile => "local changes would be overwritten",
            ConflictType::StaleDirectory => "untracked files in the directory would be lost",
            ConflictType::UntrackedOverwritten => "untracked file would be overwritten",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Conflicts {
    paths: BTreeMap<ConflictType, BTreeSet<PathBuf>>,
}

impl Conflicts {
    /// Check every path a move from the current index to `target` would touch
    ///
    /// Nothing is modified; `head` is the flattened tree of the commit HEAD points at.
    pub fn detect(
        repository: &Repository,
        index: &Index,
        head: &FileMap,
        target: &FileMap,
    ) -> anyhow::Result<Self> {
        let mut conflicts = Conflicts::default();
        let inspector = Inspector::new(repository);
        let workspace = repository.workspace();

        for entry in index.entries() {
            let stat = workspace.try_stat_file(&entry.name)?;
            let unstaged = inspector.check_index_against_workspace(entry, stat.as_ref())?
                != WorkspaceChangeType::None;
            let staged = inspector.check_index_against_head_tree(Some(entry), head.get(&entry.name))
                != IndexChangeType::None;
            let target_keeps_entry = target
                .get(&entry.name)
                .is_some_and(|target| target.oid == entry.oid && target.mode == entry.metadata.mode);

            if unstaged || (staged && !target_keeps_entry) {
                conflicts.insert(ConflictType::StaleFile, &entry.name);
            }
        }

        for path in head.keys() {
            if index.entry_by_path(path).is_none() && target.contains_key(path) {
                conflicts.insert(ConflictType::StaleFile, path);
            }
        }

        for (path, target_entry) in target {
            if index.entry_by_path(path).is_some() {
                continue;
            }

            for ancestor in path.ancestors().skip(1) {
                if ancestor.as_os_str().is_empty() || index.entry_by_path(ancestor).is_some() {
                    continue;
                }
                if workspace
                    .try_stat_file(ancestor)?
                    .is_some_and(|stat| !stat.mode.is_tree())
                {
                    conflicts.insert(ConflictType::UntrackedOverwritten, ancestor);
                }
            }

            match workspace.try_stat_file(path)? {
                None => {}
                Some(stat) if stat.mode.is_tree() => {
                    let holds_untracked = workspace
                        .list_files(Some(path))?
                        .iter()
                        .any(|file| index.entry_by_path(file).is_none());
                    if holds_untracked {
                        conflicts.insert(ConflictType::StaleDirectory, path);
                    }
                }
                Some(_) => {
                    if workspace.parse_blob(path)?.object_id()? != target_entry.oid {
                        conflicts.insert(ConflictType::UntrackedOverwritten, path);
                    }
                }
            }
        }

        Ok(conflicts)
    }

    fn insert(&mut self, conflict_type: ConflictType, path: &Path) {
        self.paths
            .entry(conflict_type)
            .or_default()
            .insert(path.to_path_buf());
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn of_type(&self, conflict_type: ConflictType) -> impl Iterator<Item = &PathBuf> {
        self.paths.get(&conflict_type).into_iter().flatten()
    }

    /// Every conflicting path once, in path order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn into_error(self) -> anyhow::Error {
        for (conflict_type, paths) in &self.paths {
            for path in paths {
                debug!(path = %path.display(), "{}", conflict_type.describe());
            }
        }

        RepoError::UncommittedChanges(self.paths()).into()
    }
}
