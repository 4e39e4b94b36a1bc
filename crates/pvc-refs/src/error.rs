//! Error types for reference operations.

use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// A reference in the chain starting at `name` does not exist.
    #[error("cannot resolve {name}: reference {missing} does not exist")]
    ReferenceResolutionFailure { name: String, missing: String },

    /// Following symbolic references from `name` returned to a visited ref.
    #[error("reference cycle while resolving {name}: {}", chain.join(" -> "))]
    ReferenceCycle { name: String, chain: Vec<String> },

    /// The symbolic chain from `name` is longer than the allowed maximum.
    #[error("reference chain from {name} exceeds {max} hops")]
    ReferenceDepthExceeded { name: String, max: usize },

    /// The reference name is not a safe relative path.
    #[error("invalid ref name {name:?}: {reason}")]
    InvalidRefName { name: String, reason: String },

    /// The reference file holds neither a hash nor a `ref: ` indirection.
    #[error("malformed ref {name}: {content:?}")]
    MalformedRef { name: String, content: String },

    /// I/O error during file-based ref operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefError {
    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRefName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
