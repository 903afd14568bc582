//! User-facing commands
//!
//! ## Commands
//!
//! - `init`: Create an empty repository
//! - `add` / `rm`: Stage and unstage files
//! - `commit`: Record the index as a new commit
//! - `status`: Three-way comparison of working tree, index and HEAD
//! - `diff`: Line diffs of unstaged or staged changes
//! - `log`: Commit history
//! - `branch`: List, create or delete branches
//! - `checkout`: Switch commits or restore files from the index
//! - `reset`: Force the current branch, index and working tree to a commit
//! - `merge-base`: Best common ancestor of two commits

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge_base;
pub mod reset;
pub mod rm;
pub mod status;
