//! Domain errors
//!
//! Everything a command can fail on for a *user* reason lives here; plumbing
//! failures stay as plain `anyhow` errors with context. Callers that need to
//! branch on a specific failure downcast with `err.downcast_ref::<VcsError>()`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VcsError {
    #[error("not a vit repository (or any parent up to filesystem root): {0}")]
    RepositoryNotFound(String),

    #[error("{kind} object {hash} not found in the database")]
    ObjectNotFound { kind: &'static str, hash: String },

    #[error("branch '{0}' not found")]
    BranchNotFound(String),

    #[error("commit '{0}' not found")]
    CommitNotFound(String),

    #[error("'{0}' is already staged")]
    ItemAlreadyStaged(String),

    #[error("'{0}' is not tracked")]
    ItemNotTracked(String),

    #[error("your local changes would be overwritten; commit or stash them first")]
    DirtyWorkingTree,

    #[error("cannot merge while HEAD is detached")]
    DetachedHeadMergeDisallowed,

    #[error("'{0}' is neither a branch nor a commit")]
    InvalidRevision(String),
}
