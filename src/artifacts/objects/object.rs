use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::RepoError;
use bytes::Bytes;
use std::io::{BufRead, Cursor};
use std::path::PathBuf;

/// Encode into the canonical on-disk representation
pub trait Packable {
    fn serialize(&self) -> anyhow::Result<Bytes>;
}

/// Decode from a payload whose envelope header has already been consumed
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        Ok(ObjectId::of(&self.serialize()?))
    }

    fn object_path(&self) -> anyhow::Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Wrap a payload in the `<kind> <size>\0` envelope
pub fn envelope(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let mut bytes = object_type.header(payload.len()).into_bytes();
    bytes.extend_from_slice(payload);
    Bytes::from(bytes)
}

/// Split an encoded object into its kind and payload, checking the declared size
pub fn open_envelope(encoded: &[u8]) -> anyhow::Result<(ObjectType, &[u8])> {
    let mut reader = Cursor::new(encoded);
    let (object_type, size) = ObjectType::parse_header(&mut reader)?;
    let payload = &encoded[reader.position() as usize..];

    if payload.len() != size {
        return Err(RepoError::corrupt(
            None,
            format!("declared size {size} but payload has {} bytes", payload.len()),
        )
        .into());
    }

    Ok((object_type, payload))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    /// Decode any object kind from its canonical encoding
    pub fn decode(encoded: &[u8]) -> anyhow::Result<Self> {
        let (object_type, payload) = open_envelope(encoded)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(payload)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(payload)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(payload)?))),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }
}
