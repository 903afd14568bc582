//! Command implementations
//!
//! Every user command is an `impl Repository` block under `porcelain`. Commands write their
//! regular output through `Repository::writer` and report failures as `anyhow::Error`, leaving
//! exit codes to the binary.

pub mod porcelain;
