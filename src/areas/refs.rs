//! References: branches and HEAD
//!
//! ## File Format
//!
//! - `refs/heads/<name>` holds the hex ID of the branch tip
//! - `HEAD` holds either `ref: refs/heads/<name>` (attached) or a hex commit ID (detached)
//!
//! A branch that HEAD names but whose file does not exist yet is unborn: it is the state of
//! a fresh repository before its first commit.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepoError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

const SYMREF_REGEX: &str = r"^ref: (.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

/// What HEAD currently designates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Branch(BranchName),
    Detached(ObjectId),
}

impl Head {
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Head::Branch(name) => Some(name),
            Head::Detached(_) => None,
        }
    }
}

#[derive(Debug, new)]
pub struct Refs {
    /// Repository directory (`.twig`)
    path: Box<Path>,
}

impl Refs {
    /// Point HEAD at a branch, which may not exist yet
    pub fn attach_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        debug!(branch = %branch_name, "attaching HEAD");
        self.update_ref_file(&self.head_path(), &format!("ref: {}", branch_name.to_ref_path()))
    }

    /// Point HEAD directly at a commit
    pub fn detach_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        debug!(%oid, "detaching HEAD");
        self.update_ref_file(&self.head_path(), oid.as_ref())
    }

    pub fn head(&self) -> anyhow::Result<Head> {
        let content = std::fs::read_to_string(self.head_path())
            .with_context(|| format!("failed to read {}", self.head_path().display()))?;
        let content = content.trim();

        let symref = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref {
            Some(symref) => Ok(Head::Branch(BranchName::try_parse_ref_path(&symref[1])?)),
            None => Ok(Head::Detached(
                ObjectId::try_parse(content.to_string())
                    .map_err(|e| RepoError::corrupt(None, format!("invalid HEAD: {e}")))?,
            )),
        }
    }

    /// Commit HEAD resolves to, or `None` on an unborn branch
    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        match self.head()? {
            Head::Branch(name) => self.read_branch(&name),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    pub fn current_branch(&self) -> anyhow::Result<Option<BranchName>> {
        Ok(self.head()?.branch().cloned())
    }

    /// Advance whatever HEAD designates: the current branch, or HEAD itself when detached
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.head()? {
            Head::Branch(name) => self.update_ref(&name, oid),
            Head::Detached(_) => self.detach_head(oid),
        }
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.path.join(branch_name.to_ref_path());
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {}", branch_path.display()))?;
        let oid = ObjectId::try_parse(content.trim().to_string()).map_err(|e| {
            RepoError::corrupt(None, format!("invalid ref {branch_name}: {e}"))
        })?;

        Ok(Some(oid))
    }

    /// Resolve `HEAD` or a branch name to a commit
    pub fn resolve_ref(&self, name: &str) -> anyhow::Result<ObjectId> {
        let oid = if name == HEAD_REF_NAME {
            self.read_head()?
        } else {
            match BranchName::try_parse(name.to_string()) {
                Ok(branch_name) => self.read_branch(&branch_name)?,
                Err(_) => None,
            }
        };

        oid.ok_or_else(|| RepoError::RefNotFound(name.to_string()).into())
    }

    pub fn update_ref(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        debug!(branch = %branch_name, %oid, "updating ref");
        let branch_path = self.path.join(branch_name.to_ref_path());
        self.update_ref_file(&branch_path, oid.as_ref())
    }

    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.path.join(branch_name.to_ref_path()).exists() {
            anyhow::bail!("a branch named '{branch_name}' already exists");
        }

        self.update_ref(branch_name, oid)
    }

    /// Remove a branch, returning the commit it pointed to
    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(branch_name)?
            .ok_or_else(|| RepoError::RefNotFound(branch_name.to_string()))?;

        let branch_path = self.path.join(branch_name.to_ref_path());
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {}", branch_path.display()))?;
        self.prune_empty_parent_dirs(&branch_path)?;

        debug!(branch = %branch_name, %oid, "deleted branch");
        Ok(oid)
    }

    /// Every branch that has a ref file, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();
        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(name.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(
            path.parent()
                .with_context(|| format!("invalid ref path {}", path.display()))?,
        )?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to open ref file at {}", path.display()))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().set_len(0)?;
        writeln!(lock.deref_mut(), "{raw_ref}")?;

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_path()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> std::path::PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn heads_path(&self) -> std::path::PathBuf {
        self.path.join("refs").join("heads")
    }
}
