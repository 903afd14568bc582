use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use derive_new::new;

/// Pairwise comparisons behind `status`, `diff` and the checkout safety check
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl Inspector<'_> {
    fn is_content_changed(&self, index_entry: &IndexEntry) -> anyhow::Result<bool> {
        let blob = self.repository.workspace().parse_blob(&index_entry.name)?;
        Ok(blob.object_id()? != index_entry.oid)
    }

    /// Compare a tracked file with what is on disk
    ///
    /// Matching size, mode and timestamps are trusted; a timestamp-only difference falls
    /// back to hashing the file. A directory standing where the file was counts as deleted.
    pub fn check_index_against_workspace(
        &self,
        entry: &IndexEntry,
        stat: Option<&EntryMetadata>,
    ) -> anyhow::Result<WorkspaceChangeType> {
        match stat {
            None => Ok(WorkspaceChangeType::Deleted),
            Some(stat) if stat.mode.is_tree() => Ok(WorkspaceChangeType::Deleted),
            Some(stat) if !entry.stat_match(stat) => Ok(WorkspaceChangeType::Modified),
            Some(stat) if entry.times_match(stat) => Ok(WorkspaceChangeType::None),
            Some(_) if self.is_content_changed(entry)? => Ok(WorkspaceChangeType::Modified),
            Some(_) => Ok(WorkspaceChangeType::None),
        }
    }

    pub fn check_index_against_head_tree(
        &self,
        index_entry: Option<&IndexEntry>,
        head_entry: Option<&DatabaseEntry>,
    ) -> IndexChangeType {
        match (index_entry, head_entry) {
            (Some(index_entry), Some(head_entry))
                if head_entry.mode != index_entry.metadata.mode
                    || head_entry.oid != index_entry.oid =>
            {
                IndexChangeType::Modified
            }
            (Some(_), None) => IndexChangeType::Added,
            (None, Some(_)) => IndexChangeType::Deleted,
            _ => IndexChangeType::None,
        }
    }
}
