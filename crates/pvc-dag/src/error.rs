//! Error types for history traversal.

use pvc_store::StoreError;
use pvc_types::{ObjectId, ObjectKind};

/// Errors that can occur while walking commit ancestry.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// A node in the walk is not a commit object.
    #[error("{id} is a {kind}, not a commit")]
    NotACommit { id: ObjectId, kind: ObjectKind },

    /// A commit's `parent` header does not hold a valid hash.
    #[error("commit {commit} has a malformed parent header: {reason}")]
    MalformedParent { commit: ObjectId, reason: String },

    /// Reading an object failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
