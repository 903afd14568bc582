//! Repository facade
//!
//! Ties the object store, refs and working tree of one repository together. The index is
//! deliberately not owned here: each command loads it with `load_index`, passes it to the
//! operations that need it and saves it once all its object writes went through.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{REPO_DIR_NAME, Workspace};
use crate::artifacts::checkout::migration::FileMap;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepoError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const INDEX_FILE_NAME: &str = "index";
const OBJECTS_DIR_NAME: &str = "objects";

pub struct Repository {
    path: Box<Path>,
    cwd: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// A repository rooted at `path`, which need not be initialized yet
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("unable to create {}", path.display()))?;
        let path = path
            .canonicalize()
            .with_context(|| format!("unable to resolve {}", path.display()))?;
        let git_path = path.join(REPO_DIR_NAME);

        Ok(Repository {
            cwd: path.clone().into_boxed_path(),
            database: Database::new(git_path.join(OBJECTS_DIR_NAME).into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            writer: RefCell::new(writer),
            path: path.into_boxed_path(),
        })
    }

    /// Find the repository containing `cwd`, looking upward through its parents
    pub fn discover(cwd: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let cwd = cwd
            .canonicalize()
            .with_context(|| format!("unable to resolve {}", cwd.display()))?;

        let root = cwd
            .ancestors()
            .find(|dir| dir.join(REPO_DIR_NAME).is_dir())
            .ok_or_else(|| RepoError::NotARepository(cwd.clone()))?;
        debug!(root = %root.display(), "found repository");

        let mut repository = Self::new(root, writer)?;
        repository.cwd = cwd.into_boxed_path();
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The repository directory (`.twig`)
    pub fn git_path(&self) -> PathBuf {
        self.path.join(REPO_DIR_NAME)
    }

    pub fn index_path(&self) -> PathBuf {
        self.git_path().join(INDEX_FILE_NAME)
    }

    pub fn load_index(&self) -> anyhow::Result<Index> {
        Index::load(self.index_path().into_boxed_path())
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// A command-line path as a path relative to the repository root
    pub fn resolve_pathspec(&self, path: &Path) -> anyhow::Result<PathBuf> {
        self.workspace.relative_path(&self.cwd, path)
    }

    /// Store the index as a tree graph and return the root tree ID
    pub fn write_tree(&self, index: &Index) -> anyhow::Result<ObjectId> {
        let tree = Tree::build(index.entries())?;
        self.database.store_tree(&tree)
    }

    /// Snapshot the index as a new commit object
    ///
    /// Refs are left alone. A single-parent commit whose tree equals its parent's is
    /// refused with `NothingToCommit`; root and merge commits are always allowed.
    pub fn create_commit(
        &self,
        index: &Index,
        parents: Vec<ObjectId>,
        message: String,
        author: Author,
    ) -> anyhow::Result<ObjectId> {
        let tree_oid = self.write_tree(index)?;

        if let [parent] = parents.as_slice()
            && self.database.parse_object_as_commit(parent)?.tree_oid() == &tree_oid
        {
            return Err(RepoError::NothingToCommit.into());
        }

        let commit = Commit::new(parents, tree_oid, author, message);
        let oid = self.database.store(&commit)?;
        info!(%oid, "created commit");

        Ok(oid)
    }

    /// Files HEAD's commit holds, empty on an unborn branch
    pub fn head_files(&self) -> anyhow::Result<FileMap> {
        self.database
            .flatten_commit(self.refs.read_head()?.as_ref())
    }

    /// What the index tracks, in the same shape as a flattened tree
    pub fn index_files(index: &Index) -> FileMap {
        index
            .entries()
            .map(|entry| {
                (
                    entry.name.clone(),
                    DatabaseEntry::new(entry.oid.clone(), entry.metadata.mode),
                )
            })
            .collect()
    }
}
