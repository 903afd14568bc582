//! Object identifier (SHA-256 hash)
//!
//! Object IDs are 64-character lowercase hexadecimal strings. Objects are stored under
//! `.twig/objects/<first-2-chars>/<remaining-62-chars>`; the first 7 characters are used
//! as the human-facing abbreviation.

use crate::artifacts::objects::{OBJECT_ID_BYTES, OBJECT_ID_LENGTH, SHORT_OID_LENGTH};
use sha2::{Digest, Sha256};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate a full hexadecimal object ID
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            anyhow::bail!("invalid object ID length: {}", id.len());
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("invalid object ID characters: {}", id);
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Hash a canonical object encoding
    pub fn of(encoded: &[u8]) -> Self {
        let digest = Sha256::digest(encoded);
        Self(format!("{digest:x}"))
    }

    /// Write the ID as raw bytes, as embedded in trees and index entries
    pub fn write_bytes_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let hex = self.as_ref();

        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an ID stored as raw bytes
    pub fn read_bytes_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_BYTES];
        reader.read_exact(&mut raw)?;

        let hex = raw.iter().map(|byte| format!("{byte:02x}")).collect::<String>();
        Self::try_parse(hex)
    }

    /// Sharded location relative to the objects directory, e.g. `ab/cdef...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    pub fn to_short_oid(&self) -> String {
        self.0[..SHORT_OID_LENGTH].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
