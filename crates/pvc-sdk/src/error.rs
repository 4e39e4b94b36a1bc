use std::path::PathBuf;

use pvc_types::{ObjectId, ObjectKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("not a pvc repository (or any parent): {}", .0.display())]
    NotARepository(PathBuf),

    #[error("repository already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("invalid worktree {}: {reason}", path.display())]
    InvalidWorktree { path: PathBuf, reason: String },

    #[error("unsupported repositoryformatversion {0}")]
    UnsupportedFormatVersion(u32),

    #[error("config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("cannot resolve {name:?}: {reason}")]
    NameResolution { name: String, reason: String },

    #[error("ambiguous name {name:?}: {} candidates", candidates.len())]
    AmbiguousName {
        name: String,
        candidates: Vec<ObjectId>,
    },

    #[error("{id} is a {actual}, expected a {expected}")]
    UnexpectedKind {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("store error: {0}")]
    Store(#[from] pvc_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] pvc_refs::RefError),

    #[error("checkout error: {0}")]
    Checkout(#[from] pvc_worktree::CheckoutError),

    #[error("history error: {0}")]
    Dag(#[from] pvc_dag::DagError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
