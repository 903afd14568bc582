//! Commit graph queries used by `merge-base`
//!
//! - `bca_finder`: best common ancestor of two commits

pub mod bca_finder;
