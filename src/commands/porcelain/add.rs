use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use std::path::{Path, PathBuf};
use tracing::debug;

impl Repository {
    /// Stage files, or every file below a directory
    ///
    /// Tracked files that no longer exist under a given path are dropped from the index, so
    /// adding a directory also stages its deletions.
    pub fn add(&self, paths: &[PathBuf]) -> anyhow::Result<()> {
        let mut index = self.load_index()?;

        let mut staged = Vec::new();
        let mut removed = Vec::new();

        for path in paths {
            let path = self.resolve_pathspec(path)?;
            let files = self.workspace().list_files(Some(&path))?;
            let tracked = index.entries_under_path(&path);

            if files.is_empty() && tracked.is_empty() {
                anyhow::bail!("pathspec '{}' did not match any files", path.display());
            }

            removed.extend(tracked.into_iter().filter(|tracked| !files.contains(tracked)));
            for file in files {
                if let Some(entry) = self.stage_file(&index, &file)? {
                    staged.push(entry);
                }
            }
        }

        // objects are written by now, so the index never points at missing blobs
        for path in removed {
            debug!(path = %path.display(), "dropping deleted file from index");
            index.unstage(&path)?;
        }
        for entry in staged {
            index.stage(entry);
        }

        index.save()
    }

    /// Store the blob for `file` and build its entry, or `None` when the entry is up to date
    fn stage_file(&self, index: &Index, file: &Path) -> anyhow::Result<Option<IndexEntry>> {
        let stat = self.workspace().stat_file(file)?;

        if let Some(entry) = index.entry_by_path(file)
            && entry.stat_match(&stat)
            && entry.times_match(&stat)
        {
            return Ok(None);
        }

        let blob = self.workspace().parse_blob(file)?;
        let oid = blob.object_id()?;
        if index
            .entry_by_path(file)
            .is_some_and(|entry| entry.oid == oid && entry.metadata == stat)
        {
            return Ok(None);
        }

        self.database().store(&blob)?;
        debug!(path = %file.display(), %oid, "staged file");

        Ok(Some(IndexEntry::new(file.to_path_buf(), oid, stat)))
    }
}
