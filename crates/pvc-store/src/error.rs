use pvc_types::{ObjectId, TypeError};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under the requested id.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// The record framing, tree entry layout, or commit text is corrupt.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// The record header names a type other than blob, tree, or commit.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// The stored bytes do not hash to the id they are filed under.
    #[error("hash mismatch: expected {expected}, computed {computed}")]
    HashMismatch {
        expected: ObjectId,
        computed: ObjectId,
    },

    /// An abbreviated hash matched more than one object.
    #[error("ambiguous object prefix {prefix}: {count} candidates")]
    AmbiguousPrefix { prefix: String, count: usize },

    /// An abbreviated hash matched no object.
    #[error("no object matches prefix {0}")]
    PrefixNotFound(String),

    /// The abbreviated hash is too short or not hex.
    #[error("invalid object prefix: {0}")]
    InvalidPrefix(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedObject(reason.into())
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnknownKind(tag) => Self::UnknownObjectType(tag),
            other => Self::MalformedObject(other.to_string()),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
