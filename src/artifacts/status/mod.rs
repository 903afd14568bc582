//! Working tree status
//!
//! Status is a three-way comparison between the working tree, the index and HEAD's tree.
//!
//! - `file_change`: per-path change kinds and how they are rendered
//! - `inspector`: the pairwise comparisons (index vs working tree, index vs HEAD)
//! - `status_info`: the full scan over all three areas

pub mod file_change;
pub mod inspector;
pub mod status_info;
