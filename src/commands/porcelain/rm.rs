use crate::areas::repository::Repository;
use crate::errors::RepoError;
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    /// Stop tracking paths, deleting the working files too unless `cached` is set
    pub fn rm(&self, paths: &[PathBuf], cached: bool) -> anyhow::Result<()> {
        let mut index = self.load_index()?;

        let mut removed = Vec::new();
        for path in paths {
            let path = self.resolve_pathspec(path)?;
            let tracked = index.entries_under_path(&path);
            if tracked.is_empty() {
                return Err(RepoError::PathNotTracked(path).into());
            }

            index.unstage(&path)?;
            removed.extend(tracked);
        }

        index.save()?;

        for path in removed {
            if !cached {
                self.workspace().remove_file(&path)?;
            }
            writeln!(self.writer(), "rm '{}'", path.display())?;
        }

        Ok(())
    }
}
