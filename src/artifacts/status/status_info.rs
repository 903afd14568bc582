use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::FileMap;
use crate::artifacts::status::file_change::{FileChange, IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result of one three-way scan
///
/// Only paths with at least one difference appear in `changed_files`.
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub(crate) changed_files: BTreeMap<PathBuf, FileChange>,
    pub(crate) untracked_files: BTreeSet<PathBuf>,
    pub(crate) head_tree: FileMap,
}

impl StatusInfo {
    /// Staged changes, in path order
    pub fn index_changes(&self) -> impl Iterator<Item = (&PathBuf, &FileChange)> {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
    }

    /// Unstaged changes to tracked files, in path order
    pub fn workspace_changes(&self) -> impl Iterator<Item = (&PathBuf, &FileChange)> {
        self.changed_files
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
    }

    pub fn untracked_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.untracked_files.iter()
    }

    pub fn change_of(&self, path: &Path) -> FileChange {
        self.changed_files.get(path).copied().unwrap_or_default()
    }

    pub fn head_tree(&self) -> &FileMap {
        &self.head_tree
    }

    /// Nothing staged, nothing modified, nothing untracked
    pub fn is_clean(&self) -> bool {
        self.changed_files.is_empty() && self.untracked_files.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    /// Compare working tree, index and HEAD
    ///
    /// Index entries whose file is unchanged but whose cached stat information went stale
    /// are refreshed in `index`; the caller decides whether to save it.
    pub fn collect(&self, index: &mut Index) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.repository);
        let head_tree = self
            .repository
            .database()
            .flatten_commit(self.repository.refs().read_head()?.as_ref())?;

        let untracked_files = self
            .repository
            .workspace()
            .list_files(None)?
            .into_iter()
            .filter(|path| index.entry_by_path(path).is_none())
            .collect::<BTreeSet<_>>();

        let mut changed_files = BTreeMap::<PathBuf, FileChange>::new();
        let mut refreshed = Vec::new();

        for entry in index.entries() {
            let stat = self.repository.workspace().try_stat_file(&entry.name)?;
            let workspace_change = inspector.check_index_against_workspace(entry, stat.as_ref())?;
            let index_change =
                inspector.check_index_against_head_tree(Some(entry), head_tree.get(&entry.name));

            if workspace_change == WorkspaceChangeType::None
                && let Some(stat) = stat
            {
                refreshed.push((entry.name.clone(), stat));
            }

            let change = FileChange {
                index_change,
                workspace_change,
            };
            if !change.is_unmodified() {
                changed_files.insert(entry.name.clone(), change);
            }
        }

        for (path, stat) in refreshed {
            index.update_entry_stat(&path, stat);
        }

        for path in head_tree.keys() {
            if index.entry_by_path(path).is_none() {
                changed_files.entry(path.clone()).or_default().index_change =
                    IndexChangeType::Deleted;
            }
        }

        debug!(
            changed = changed_files.len(),
            untracked = untracked_files.len(),
            "collected status"
        );

        Ok(StatusInfo {
            changed_files,
            untracked_files,
            head_tree,
        })
    }
}
