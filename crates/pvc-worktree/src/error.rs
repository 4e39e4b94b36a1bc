//! Error types for the worktree crate.

use std::path::PathBuf;

use pvc_types::{ObjectId, ObjectKind};

/// Errors that can occur while materialising or listing trees.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The destination exists and is not an empty directory.
    #[error("cannot check out into {}: {reason}", path.display())]
    CheckoutPrecondition { path: PathBuf, reason: String },

    /// A tree entry name would write outside its directory.
    #[error("unsafe tree entry name {name:?}: {reason}")]
    UnsafeEntryName { name: String, reason: String },

    /// The object given as the root of a checkout or listing is not a tree.
    #[error("{id} is a {kind}, not a tree")]
    NotATree { id: ObjectId, kind: ObjectKind },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] pvc_store::StoreError),

    /// Filesystem write failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for checkout results.
pub type CheckoutResult<T> = Result<T, CheckoutError>;
