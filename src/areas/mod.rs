//! Stateful repository components
//!
//! - `database`: content-addressed object store
//! - `index`: staging area, loaded and saved explicitly by each command
//! - `refs`: branches and HEAD
//! - `repository`: facade tying the areas together, plus repository discovery
//! - `workspace`: working tree file system access

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
