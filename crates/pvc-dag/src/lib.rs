//! Commit history traversal for PVC.
//!
//! Walks the parent links between commits without recursion. Every commit
//! reachable from a starting point is expanded exactly once, however many
//! paths lead to it.

pub mod error;
pub mod graph;
pub mod walk;

pub use error::{DagError, DagResult};
pub use graph::{CommitSummary, HistoryGraph};
pub use walk::{walk, Ancestors, Edge, Visit};
