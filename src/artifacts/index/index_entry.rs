//! Index entry representation
//!
//! Each entry tracks one file: its repository-relative path, the blob holding its staged
//! content, and the stat information seen when it was staged. Matching stat information
//! lets `add` and `status` skip re-hashing files that did not change.
//!
//! ## Entry Format
//!
//! ```text
//! ctime ctime_nsec mtime mtime_nsec dev ino mode uid gid size   10 x u32
//! object ID                                                     32 bytes
//! flags (path length, capped)                                   u16
//! path, NUL-terminated, padded with NULs to a multiple of 8
//! ```

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::cmp::min;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};

const MAX_PATH_SIZE: usize = 0xfff;

/// Block size for entry alignment
pub const ENTRY_BLOCK: usize = 8;

/// Smallest possible entry: fixed fields plus a one-byte name and its terminator, padded
pub const ENTRY_MIN_SIZE: usize = 80;

const OID_OFFSET: usize = 40;
const FLAGS_OFFSET: usize = 72;
const NAME_OFFSET: usize = 74;

/// Flags value for an entry named `name`: its length in bytes, capped at 12 bits
pub fn path_flags(name: &str) -> u32 {
    min(name.len(), MAX_PATH_SIZE) as u32
}

#[derive(Debug, Clone, Default, new)]
pub struct IndexEntry {
    /// Path relative to the repository root
    pub name: PathBuf,
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("invalid file name {:?}", self.name))
    }

    /// Every ancestor directory of the entry, outermost first
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = self
            .name
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect::<Vec<_>>();
        dirs.reverse();
        dirs
    }

    /// Size and mode agree; an unknown (zero) size never rules a match out
    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        (self.metadata.size == 0 || self.metadata.size == other.size)
            && self.metadata.mode == other.mode
    }

    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }

    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let entry_name = self
            .name
            .to_str()
            .ok_or_else(|| anyhow!("invalid entry name {:?}", self.name))?;

        let mut entry_bytes = Vec::with_capacity(ENTRY_MIN_SIZE);
        for field in [
            self.metadata.ctime as u32,
            self.metadata.ctime_nsec as u32,
            self.metadata.mtime as u32,
            self.metadata.mtime_nsec as u32,
            self.metadata.dev as u32,
            self.metadata.ino as u32,
            self.metadata.mode.as_u32(),
            self.metadata.uid,
            self.metadata.gid,
            self.metadata.size as u32,
        ] {
            entry_bytes.write_u32::<NetworkEndian>(field)?;
        }
        self.oid.write_bytes_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<NetworkEndian>(path_flags(entry_name) as u16)?;
        entry_bytes.write_all(entry_name.as_bytes())?;

        // at least one NUL terminates the name
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }

    pub fn deserialize(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(anyhow!("invalid index entry size"));
        }

        let field = |n: usize| NetworkEndian::read_u32(&bytes[n * 4..n * 4 + 4]);
        let mode = EntryMode::try_from(field(6))?;

        let oid = ObjectId::read_bytes_from(&mut &bytes[OID_OFFSET..FLAGS_OFFSET])?;
        let flags = NetworkEndian::read_u16(&bytes[FLAGS_OFFSET..NAME_OFFSET]) as u32;

        let name_end = bytes[NAME_OFFSET..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| anyhow!("missing NUL terminator in entry name"))?;
        let name = std::str::from_utf8(&bytes[NAME_OFFSET..NAME_OFFSET + name_end])
            .map_err(|_| anyhow!("invalid UTF-8 in entry name"))?;

        Ok(IndexEntry {
            name: PathBuf::from(name),
            oid,
            metadata: EntryMetadata {
                ctime: field(0) as i64,
                ctime_nsec: field(1) as i64,
                mtime: field(2) as i64,
                mtime_nsec: field(3) as i64,
                dev: field(4) as u64,
                ino: field(5) as u64,
                mode,
                uid: field(7),
                gid: field(8),
                size: field(9) as u64,
                flags,
            },
        })
    }
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Stat information cached for change detection
///
/// Values are stored truncated to 32 bits on disk, the same way they are compared after a
/// reload, so a file that was not touched keeps matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: i64,
    pub ctime_nsec: i64,
    pub mtime: i64,
    pub mtime_nsec: i64,
    pub dev: u64,
    pub ino: u64,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    /// Length of the repository-relative path, capped at 12 bits
    pub flags: u32,
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self, Self::Error> {
        let mode = if metadata.is_dir() {
            EntryMode::Directory
        } else if file_path.is_executable() {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        };
        let file_path = file_path
            .to_str()
            .ok_or_else(|| anyhow!("invalid file path {file_path:?}"))?;

        Ok(Self {
            ctime: metadata.ctime() as u32 as i64,
            ctime_nsec: metadata.ctime_nsec() as u32 as i64,
            mtime: metadata.mtime() as u32 as i64,
            mtime_nsec: metadata.mtime_nsec() as u32 as i64,
            dev: metadata.dev() as u32 as u64,
            ino: metadata.ino() as u32 as u64,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32 as u64,
            flags: path_flags(file_path),
        })
    }
}
