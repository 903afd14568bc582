//! Working tree access
//!
//! All paths handed to and returned from the workspace are relative to the repository root.
//! The repository directory itself is never listed.

use crate::areas::database::Database;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::{EntryMetadata, path_flags};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Name of the repository directory inside the working tree
pub const REPO_DIR_NAME: &str = ".twig";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_ignored(path: &Path) -> bool {
        path.components()
            .any(|component| component.as_os_str() == REPO_DIR_NAME)
    }

    /// Every file at or below `root`, in path order
    ///
    /// A `root` that is a file yields just that file; one that does not exist yields nothing.
    pub fn list_files(&self, root: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let start = match root {
            Some(root) if Self::is_ignored(root) => return Ok(Vec::new()),
            Some(root) => self.path.join(root),
            None => self.path.to_path_buf(),
        };
        if !start.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != REPO_DIR_NAME);

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.path().strip_prefix(&self.path)?.to_path_buf());
            }
        }
        files.sort();

        Ok(files)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let content = std::fs::read(self.path.join(file_path))
            .with_context(|| format!("unable to read {}", file_path.display()))?;

        Ok(Bytes::from(content))
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        let metadata = std::fs::symlink_metadata(self.path.join(file_path))
            .with_context(|| format!("unable to stat {}", file_path.display()))?;

        let mut stat: EntryMetadata = (self.path.join(file_path).as_path(), metadata).try_into()?;
        stat.flags = path_flags(
            file_path
                .to_str()
                .with_context(|| format!("invalid file path {}", file_path.display()))?,
        );

        Ok(stat)
    }

    /// Stat information for a path, or `None` when nothing is there
    pub fn try_stat_file(&self, file_path: &Path) -> anyhow::Result<Option<EntryMetadata>> {
        match std::fs::symlink_metadata(self.path.join(file_path)) {
            Ok(_) => self.stat_file(file_path).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotADirectory => Ok(None),
            Err(e) => Err(e).with_context(|| format!("unable to stat {}", file_path.display())),
        }
    }

    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: EntryMode) -> anyhow::Result<()> {
        let path = self.path.join(file_path);
        if let Some(parent) = path.parent() {
            self.make_directory(parent)?;
        }
        if path.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("unable to replace directory {}", file_path.display()))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("unable to open {}", file_path.display()))?;
        file.write_all(data)
            .with_context(|| format!("unable to write {}", file_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode.permissions()))
                .with_context(|| format!("unable to set permissions on {}", file_path.display()))?;
        }

        Ok(())
    }

    /// Delete a file and any directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);
        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("unable to remove {}", file_path.display()))?;
        }

        self.prune_empty_parents(file_path)
    }

    fn prune_empty_parents(&self, file_path: &Path) -> anyhow::Result<()> {
        for parent in file_path.ancestors().skip(1) {
            if parent.as_os_str().is_empty() {
                break;
            }

            let dir = self.path.join(parent);
            if !dir.is_dir() || dir.read_dir()?.next().is_some() {
                break;
            }
            std::fs::remove_dir(&dir)
                .with_context(|| format!("unable to remove directory {}", parent.display()))?;
        }

        Ok(())
    }

    /// Create `dir` and its parents, replacing any file standing in the way
    fn make_directory(&self, dir: &Path) -> anyhow::Result<()> {
        let relative = dir.strip_prefix(&self.path).unwrap_or(dir);
        let mut current = self.path.to_path_buf();

        for component in relative.components() {
            current.push(component);
            if current.is_file() {
                std::fs::remove_file(&current)
                    .with_context(|| format!("unable to replace file {}", current.display()))?;
            }
            if !current.exists() {
                std::fs::create_dir(&current)
                    .with_context(|| format!("unable to create directory {}", current.display()))?;
            }
        }

        Ok(())
    }

    /// Carry out a planned checkout: deletions first, then writes
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> anyhow::Result<()> {
        for path in migration.deletions() {
            self.remove_file(path)?;
        }

        for (path, entry) in migration.writes() {
            let blob = database.parse_object_as_blob(&entry.oid)?;
            self.write_file(path, blob.content(), entry.mode)?;
        }

        Ok(())
    }

    /// Turn a command-line path into one relative to the repository root
    ///
    /// The path is resolved against `cwd` lexically, so it does not need to exist. Paths that
    /// leave the working tree are rejected.
    pub fn relative_path(&self, cwd: &Path, path: &Path) -> anyhow::Result<PathBuf> {
        let mut resolved = PathBuf::new();

        for component in cwd.join(path).components() {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::CurDir => {}
                other => resolved.push(other),
            }
        }

        resolved
            .strip_prefix(&self.path)
            .map(Path::to_path_buf)
            .with_context(|| format!("{} is outside repository at {}", path.display(), self.path.display()))
    }
}
