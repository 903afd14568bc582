//! Commit history traversal
//!
//! - `rev_list`: lazy, newest-first walk over the commit graph

pub mod rev_list;
