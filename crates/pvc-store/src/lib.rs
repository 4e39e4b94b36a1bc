//! Content-addressed object storage for PVC.
//!
//! Every piece of repository data (file contents, directory listings,
//! commits) is stored as an immutable object identified by the SHA-1 of its
//! framed record `<type> <len>\0<payload>`.
//!
//! # Object Types
//!
//! - [`Blob`] -- raw file content
//! - [`Tree`] -- directory listing of [`TreeEntry`] rows
//! - [`Commit`] -- [`Kvlm`] headers naming a tree and parents, plus a message
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FsObjectStore`] -- zlib-compressed loose objects under `.pvc/objects`
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Ids are always recomputed from the bytes, never trusted from the caller.
//! 3. Filesystem reads verify the stored bytes against the requested id.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod codec;
pub mod commit;
pub mod error;
pub mod fs;
pub mod kvlm;
pub mod memory;
pub mod object;
pub mod traits;
pub mod tree;

pub use commit::{Commit, CommitBuilder};
pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use kvlm::Kvlm;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Object};
pub use pvc_types::{ObjectId, ObjectKind};
pub use traits::{ObjectStore, MIN_PREFIX_LEN};
pub use tree::{EntryMode, Tree, TreeEntry};
