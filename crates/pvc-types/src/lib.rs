//! Foundation types for PVC, a content-addressable object store.
//!
//! This crate provides the identifier and tagging types shared by every other
//! PVC crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (SHA-1 of the framed record)
//! - [`ObjectKind`] -- The closed set of object variants: blob, tree, commit

pub mod error;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use kind::ObjectKind;
pub use object::{ObjectId, HASH_LEN, HEX_LEN};
