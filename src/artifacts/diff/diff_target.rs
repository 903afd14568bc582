use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::path::{Path, PathBuf};

const NULL_PATH: &str = "/dev/null";

/// One side of a file diff: where the content came from and its lines
///
/// A side with no mode is a file that does not exist there (added or deleted).
#[derive(Debug, Clone)]
pub struct DiffTarget {
    pub(crate) file: PathBuf,
    pub(crate) oid: ObjectId,
    pub(crate) mode: Option<EntryMode>,
    pub(crate) data: Vec<String>,
}

impl DiffTarget {
    /// A file as recorded in a tree
    pub fn from_entry(file: &Path, entry: &DatabaseEntry, database: &Database) -> anyhow::Result<Self> {
        let blob = database.parse_object_as_blob(&entry.oid)?;

        Ok(DiffTarget {
            file: file.to_path_buf(),
            oid: entry.oid.clone(),
            mode: Some(entry.mode),
            data: blob.lines(),
        })
    }

    pub fn from_index(entry: &IndexEntry, database: &Database) -> anyhow::Result<Self> {
        Self::from_entry(
            &entry.name,
            &DatabaseEntry::new(entry.oid.clone(), entry.metadata.mode),
            database,
        )
    }

    pub fn from_file(file: &Path, workspace: &Workspace) -> anyhow::Result<Self> {
        let blob = workspace.parse_blob(file)?;
        let stat = workspace.stat_file(file)?;

        Ok(DiffTarget {
            file: file.to_path_buf(),
            oid: blob.object_id()?,
            mode: Some(stat.mode),
            data: blob.lines(),
        })
    }

    pub fn from_nothing(file: &Path) -> Self {
        DiffTarget {
            file: file.to_path_buf(),
            oid: null_oid(),
            mode: None,
            data: Vec::new(),
        }
    }

    /// Path shown on the `---`/`+++` lines
    pub fn diff_path(&self, prefix: &str) -> PathBuf {
        match self.mode {
            Some(_) => Path::new(prefix).join(&self.file),
            None => PathBuf::from(NULL_PATH),
        }
    }

    pub fn pretty_mode(&self) -> &'static str {
        self.mode.unwrap_or_default().as_str()
    }
}

fn null_oid() -> ObjectId {
    ObjectId::try_parse("0".repeat(OBJECT_ID_LENGTH)).unwrap_or_default()
}
