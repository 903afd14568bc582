//! Object codec
//!
//! Every piece of history is stored as one of three immutable object kinds:
//!
//! - **Blob**: raw file content
//! - **Tree**: one directory level (names, modes and object IDs, sorted by name)
//! - **Commit**: a root tree, ordered parents, author/committer and a message
//!
//! All kinds share the canonical envelope `<kind> <size>\0<payload>`; the object ID is the
//! SHA-256 digest of that envelope, so equal content always yields the same ID.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-256 object ID in hexadecimal form
pub const OBJECT_ID_LENGTH: usize = 64;

/// Length of a SHA-256 object ID in raw bytes
pub const OBJECT_ID_BYTES: usize = OBJECT_ID_LENGTH / 2;

/// Length of the abbreviated ID shown to users
pub const SHORT_OID_LENGTH: usize = 7;

/// Shortest hash prefix accepted when resolving revisions
pub const MIN_PREFIX_LENGTH: usize = 4;
