//! Object store
//!
//! Objects live under `objects/<2 hex>/<62 hex>`, zlib-compressed. The store is append-only:
//! an object that already exists is never rewritten, which also makes writes idempotent.
//!
//! New objects are written to a temporary file in their shard directory and renamed into
//! place, so a half-written object is never visible under its final name. Reads re-hash the
//! inflated bytes and refuse to return anything whose hash does not match its name.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepoError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist a canonical encoding and return its ID; a no-op when the object is present
    pub fn put(&self, encoded: &[u8]) -> anyhow::Result<ObjectId> {
        let oid = ObjectId::of(encoded);
        let object_path = self.path.join(oid.to_path());

        if object_path.exists() {
            trace!(%oid, "object already stored");
            return Ok(oid);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(object_dir, &object_path, encoded)?;
        debug!(%oid, size = encoded.len(), "stored object");

        Ok(oid)
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        self.put(&object.serialize()?)
    }

    /// Store every subtree of a freshly built tree, children before parents
    pub fn store_tree(&self, tree: &Tree) -> anyhow::Result<ObjectId> {
        tree.traverse(&mut |subtree: &Tree| self.store(subtree).map(|_| ()))?;
        tree.object_id()
    }

    /// Canonical encoding of a stored object, verified against its ID
    pub fn get(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(oid.to_path());
        if !object_path.is_file() {
            return Err(RepoError::ObjectNotFound(oid.clone()).into());
        }

        let compressed = std::fs::read(&object_path)
            .with_context(|| format!("unable to read object file {}", object_path.display()))?;
        let encoded = Self::decompress(&compressed)
            .map_err(|e| RepoError::corrupt(Some(oid), e.to_string()))?;

        if ObjectId::of(&encoded) != *oid {
            return Err(RepoError::corrupt(Some(oid), "content does not match its hash").into());
        }

        Ok(encoded)
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.to_path()).is_file()
    }

    pub fn parse_object(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        ObjectBox::decode(&self.get(oid)?).map_err(|e| match e.downcast::<RepoError>() {
            Ok(RepoError::CorruptObject { reason, .. }) => RepoError::corrupt(Some(oid), reason).into(),
            Ok(other) => other.into(),
            Err(e) => e,
        })
    }

    pub fn object_type(&self, oid: &ObjectId) -> anyhow::Result<ObjectType> {
        Ok(self.parse_object(oid)?.object_type())
    }

    pub fn parse_object_as_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        match self.parse_object(oid)? {
            ObjectBox::Blob(blob) => Ok(*blob),
            other => Err(Self::unexpected_kind(oid, ObjectType::Blob, other.object_type())),
        }
    }

    pub fn parse_object_as_tree(&self, oid: &ObjectId) -> anyhow::Result<Tree> {
        match self.parse_object(oid)? {
            ObjectBox::Tree(tree) => Ok(*tree),
            other => Err(Self::unexpected_kind(oid, ObjectType::Tree, other.object_type())),
        }
    }

    pub fn parse_object_as_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        match self.parse_object(oid)? {
            ObjectBox::Commit(commit) => Ok(*commit),
            other => Err(Self::unexpected_kind(oid, ObjectType::Commit, other.object_type())),
        }
    }

    pub fn load_slim_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.parse_object_as_commit(oid)?.to_slim(oid.clone()))
    }

    fn unexpected_kind(oid: &ObjectId, expected: ObjectType, found: ObjectType) -> anyhow::Error {
        RepoError::corrupt(Some(oid), format!("expected a {expected}, found a {found}")).into()
    }

    /// Every file reachable from a tree, keyed by its path relative to that tree
    pub fn flatten_tree(&self, oid: &ObjectId) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let mut files = BTreeMap::new();
        self.collect_tree_files(oid, Path::new(""), &mut files)?;
        Ok(files)
    }

    fn collect_tree_files(
        &self,
        oid: &ObjectId,
        prefix: &Path,
        files: &mut BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<()> {
        for (name, entry) in self.parse_object_as_tree(oid)?.entries()? {
            let path = prefix.join(name);

            if entry.is_tree() {
                self.collect_tree_files(&entry.oid, &path, files)?;
            } else {
                files.insert(path, entry);
            }
        }

        Ok(())
    }

    /// Files of a commit's tree, or nothing for the unborn branch
    pub fn flatten_commit(
        &self,
        commit_oid: Option<&ObjectId>,
    ) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        match commit_oid {
            Some(oid) => self.flatten_tree(self.parse_object_as_commit(oid)?.tree_oid()),
            None => Ok(BTreeMap::new()),
        }
    }

    fn write_object(&self, object_dir: &Path, object_path: &Path, encoded: &[u8]) -> anyhow::Result<()> {
        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let compressed = Self::compress(encoded)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .with_context(|| format!("unable to open object file {}", temp_object_path.display()))?;

        let written = file
            .write_all(&compressed)
            .and_then(|_| file.sync_all())
            .with_context(|| format!("unable to write object file {}", temp_object_path.display()))
            // the rename is the commit point of the write
            .and_then(|_| {
                std::fs::rename(&temp_object_path, object_path).with_context(|| {
                    format!("unable to rename object file to {}", object_path.display())
                })
            });

        if written.is_err()
            && let Err(e) = std::fs::remove_file(&temp_object_path)
        {
            warn!(path = %temp_object_path.display(), error = %e, "unable to remove temporary object");
        }

        written
    }

    fn compress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .context("unable to finish compressing object content")
    }

    fn decompress(data: &[u8]) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("unable to decompress object content")?;

        Ok(decompressed.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// All stored objects whose ID starts with `prefix`
    ///
    /// Only the shard directory named by the first two characters is scanned.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let Some((dir_name, file_prefix)) = prefix.split_at_checked(2) else {
            return Ok(Vec::new());
        };
        let dir_path = self.path.join(dir_name);
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir_path)? {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix)
                && let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}"))
            {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }
}
