//! twig: a small content-addressed version control engine
//!
//! The library holds everything the `twig` binary does; the binary only parses arguments,
//! picks an output writer and maps errors to exit codes.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
