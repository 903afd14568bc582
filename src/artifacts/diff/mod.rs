//! Content diffs
//!
//! - `diff_algorithm`: Myers' shortest edit script and unified-diff hunks
//! - `diff_target`: one side of a file diff, loaded from a tree, the index or the working tree

pub mod diff_algorithm;
pub mod diff_target;
