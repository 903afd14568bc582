//! Data types and algorithms the areas and commands are built from
//!
//! - `branch`: Branch names and revision parsing
//! - `checkout`: Migration planning and conflict detection
//! - `core`: Pager output
//! - `database`: Tree entries as read from the store
//! - `diff`: Myers line diff and diff sides
//! - `index`: Index file format
//! - `log`: Lazy history traversal
//! - `merge`: Best common ancestor search
//! - `objects`: Object codec (blob, tree, commit)
//! - `status`: Three-way status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod database;
pub mod diff;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
