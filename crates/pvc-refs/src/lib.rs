//! Named references for PVC repositories.
//!
//! References are the human-readable entry points into the object graph,
//! stored as small files under the repository directory. Each holds either
//! a 40-hex object id or an indirection `ref: <other ref>`.
//!
//! - **HEAD** normally holds `ref: refs/heads/master`.
//! - **Branches** live under `refs/heads/`, **tags** under `refs/tags/`.
//!
//! Resolution follows indirections iteratively and fails on cycles rather
//! than looping.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`types`] -- [`RefValue`] and the resolved [`RefTree`]
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`resolver`] -- Symbolic-ref resolution and listing
//! - [`names`] -- Ref name validation
//! - [`fs`] -- [`FsRefStore`], the on-disk backend
//! - [`memory`] -- In-memory [`InMemoryRefStore`] for tests

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod resolver;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::validate_ref_name;
pub use resolver::MAX_SYMREF_DEPTH;
pub use traits::RefStore;
pub use types::{RefNode, RefTree, RefValue, SYMREF_PREFIX};
