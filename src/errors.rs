//! Repository error taxonomy
//!
//! Every failure a command can surface to the user is one of these variants. They travel
//! inside `anyhow::Error` so that call sites can keep adding context, and the CLI recovers
//! the typed value with `downcast_ref` to pick the message style and exit code.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code used for conditions the user is expected to fix and retry
pub const EXIT_RECOVERABLE: i32 = 1;

/// Exit code used for everything else
pub const EXIT_FATAL: i32 = 128;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("corrupt object{}: {reason}", describe_oid(.oid))]
    CorruptObject {
        oid: Option<ObjectId>,
        reason: String,
    },

    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    #[error(
        "your local changes to the following files would be overwritten by checkout:\n{}\nPlease commit your changes before you switch branches.",
        tab_list(.0)
    )]
    UncommittedChanges(Vec<PathBuf>),

    #[error("reference {0} not found")]
    RefNotFound(String),

    #[error("short hash {prefix} is ambiguous, candidates: {}", comma_list(.candidates))]
    AmbiguousRef {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("not a twig repository (or any of the parent directories): {}", .0.display())]
    NotARepository(PathBuf),

    #[error("pathspec '{}' did not match any tracked file", .0.display())]
    PathNotTracked(PathBuf),
}

fn describe_oid(oid: &Option<ObjectId>) -> String {
    oid.as_ref().map(|oid| format!(" {oid}")).unwrap_or_default()
}

fn tab_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("\t{}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn comma_list(items: &[String]) -> String {
    items.join(", ")
}

impl RepoError {
    pub fn corrupt(oid: Option<&ObjectId>, reason: impl Into<String>) -> Self {
        RepoError::CorruptObject {
            oid: oid.cloned(),
            reason: reason.into(),
        }
    }

    /// Conditions that are part of normal usage rather than damage or misuse
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RepoError::NothingToCommit | RepoError::UncommittedChanges(_)
        )
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_recoverable() {
            EXIT_RECOVERABLE
        } else {
            EXIT_FATAL
        }
    }
}
