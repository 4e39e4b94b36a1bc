//! High-level SDK for PVC repositories.
//!
//! [`Repository`] ties the object store, ref store, checkout and history
//! crates together behind one handle opened on a worktree directory. This
//! is the main entry point for the `pvc` binary and for applications
//! embedding PVC.

pub mod config;
pub mod error;
pub mod name;
pub mod repository;

pub use config::{CoreConfig, RepoConfig, REPOSITORY_FORMAT_VERSION};
pub use error::{SdkError, SdkResult};
pub use repository::{Repository, DEFAULT_BRANCH, REPO_DIR};

// Re-export key types
pub use pvc_dag::{CommitSummary, HistoryGraph};
pub use pvc_refs::{RefStore, RefTree, RefValue};
pub use pvc_store::{Blob, Commit, CommitBuilder, EntryMode, Object, ObjectStore, Tree, TreeEntry};
pub use pvc_types::{ObjectId, ObjectKind};
pub use pvc_worktree::{CheckoutReport, TreeRow};
