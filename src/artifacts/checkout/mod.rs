//! Moving the working tree and index to another commit
//!
//! - `conflict`: finds local work a checkout would destroy, before anything is touched
//! - `migration`: the deletions and writes that turn one file map into another

pub mod conflict;
pub mod migration;
