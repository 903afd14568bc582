//! Tree object
//!
//! A tree is one directory level: a list of named entries pointing at blobs (files) and
//! other trees (subdirectories).
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<octal mode> <name>\0<32-byte raw hash>`
//!
//! Entries are ordered by the bytes of their name, so the same logical directory always
//! encodes, and therefore hashes, the same way no matter in which order it was assembled.
//!
//! ## Tree Building
//!
//! Trees built from the index hold nested `Subtree` nodes that have not been stored yet.
//! [`Tree::traverse`] walks them children-first so every subtree can be written before the
//! parent that embeds its ID. Trees read back from the database only hold plain entries.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, envelope};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepoError;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Component;

#[derive(Debug, Clone, PartialEq)]
enum TreeNode {
    /// Blob, or a subtree that is already stored
    Entry(DatabaseEntry),
    /// Subtree still being built
    Subtree(Tree),
}

impl TreeNode {
    fn database_entry(&self) -> anyhow::Result<DatabaseEntry> {
        match self {
            TreeNode::Entry(entry) => Ok(entry.clone()),
            TreeNode::Subtree(tree) => Ok(DatabaseEntry::new(tree.object_id()?, EntryMode::Directory)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    entries: BTreeMap<String, TreeNode>,
}

impl Tree {
    /// Build the nested tree for a flat set of index entries
    ///
    /// Directories only appear as the parents of at least one file, so an empty directory
    /// never produces a tree.
    pub fn build<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let components = entry
                .name
                .components()
                .map(|component| match component {
                    Component::Normal(name) => name
                        .to_str()
                        .map(str::to_string)
                        .with_context(|| format!("non UTF-8 path {:?}", entry.name)),
                    _ => anyhow::bail!("path {:?} is not repository-relative", entry.name),
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let (file_name, parents) = components
                .split_last()
                .with_context(|| format!("empty index path {:?}", entry.name))?;
            root.add_entry(
                parents,
                file_name,
                DatabaseEntry::new(entry.oid.clone(), entry.metadata.mode),
            );
        }

        Ok(root)
    }

    fn add_entry(&mut self, parents: &[String], file_name: &str, entry: DatabaseEntry) {
        match parents.split_first() {
            None => {
                self.entries
                    .insert(file_name.to_string(), TreeNode::Entry(entry));
            }
            Some((parent, rest)) => {
                let node = self
                    .entries
                    .entry(parent.clone())
                    .or_insert_with(|| TreeNode::Subtree(Tree::default()));

                if let TreeNode::Entry(_) = node {
                    *node = TreeNode::Subtree(Tree::default());
                }
                if let TreeNode::Subtree(tree) = node {
                    tree.add_entry(rest, file_name, entry);
                }
            }
        }
    }

    /// Visit every unsaved subtree before its parent, ending with `self`
    pub fn traverse<F>(&self, func: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&Tree) -> anyhow::Result<()>,
    {
        for node in self.entries.values() {
            if let TreeNode::Subtree(tree) = node {
                tree.traverse(func)?;
            }
        }

        func(self)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of this level in name order, with IDs computed for unsaved subtrees
    pub fn entries(&self) -> anyhow::Result<BTreeMap<String, DatabaseEntry>> {
        self.entries
            .iter()
            .map(|(name, node)| Ok((name.clone(), node.database_entry()?)))
            .collect()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut payload = Vec::new();

        for (name, node) in &self.entries {
            let entry = node.database_entry()?;

            payload.write_all(format!("{} {}", entry.mode.as_str(), name).as_bytes())?;
            payload.push(0);
            entry.oid.write_bytes_to(&mut payload)?;
        }

        Ok(envelope(self.object_type(), &payload))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut previous_name: Option<String> = None;

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            if reader.read_until(b' ', &mut mode_bytes)? == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(RepoError::corrupt(None, "truncated tree entry mode").into());
            }
            let mode = std::str::from_utf8(&mode_bytes)
                .map_err(|_| RepoError::corrupt(None, "tree entry mode is not ASCII"))?;
            let mode = EntryMode::try_from(mode)?;

            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(RepoError::corrupt(None, "truncated tree entry name").into());
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| RepoError::corrupt(None, "tree entry name is not UTF-8"))?;
            if name.is_empty() || name == "." || name == ".." || name.contains('/') {
                return Err(RepoError::corrupt(None, format!("invalid tree entry name '{name}'")).into());
            }
            if previous_name.as_ref().is_some_and(|previous| *previous >= name) {
                return Err(RepoError::corrupt(None, format!("tree entry '{name}' is out of order")).into());
            }

            let oid = ObjectId::read_bytes_from(&mut reader)
                .map_err(|_| RepoError::corrupt(None, "truncated tree entry hash"))?;

            previous_name = Some(name.clone());
            entries.insert(name, TreeNode::Entry(DatabaseEntry::new(oid, mode)));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, node)| {
                let entry = node
                    .database_entry()
                    .map(|entry| {
                        let kind = if entry.is_tree() {
                            ObjectType::Tree
                        } else {
                            ObjectType::Blob
                        };
                        format!("{} {} {}", entry.mode.as_str(), kind, entry.oid)
                    })
                    .unwrap_or_default();
                format!("{entry}\t{name}")
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
