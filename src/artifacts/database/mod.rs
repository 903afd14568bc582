//! Database entry types
//!
//! Entries read back from stored trees: an object ID paired with its mode.

pub mod database_entry;
