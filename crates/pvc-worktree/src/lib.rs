//! Working-directory materialisation for PVC.
//!
//! Turns stored trees back into files on disk, and renders trees as
//! `ls-tree` listings.
//!
//! # Key Types
//!
//! - [`checkout()`] -- Write a tree into an empty or missing directory
//! - [`CheckoutReport`] -- Counts of what a checkout wrote
//! - [`ls_tree`] / [`TreeRow`] -- Flat or recursive tree listings

pub mod checkout;
pub mod error;
pub mod listing;

pub use checkout::{checkout, CheckoutReport};
pub use error::{CheckoutError, CheckoutResult};
pub use listing::{ls_tree, TreeRow};
