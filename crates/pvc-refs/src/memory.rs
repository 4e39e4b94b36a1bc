//! In-memory reference store for testing and ephemeral use.
//!
//! [`InMemoryRefStore`] keeps refs in a `BTreeMap` protected by a `RwLock`.
//! It implements the full [`RefStore`] trait, including name validation, so
//! it behaves like the filesystem store minus persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{RefError, Result};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::RefValue;

/// An in-memory implementation of [`RefStore`].
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<BTreeMap<String, RefValue>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(err: E) -> RefError {
    RefError::Io(std::io::Error::other(format!("lock poisoned: {err}")))
}

impl RefStore for InMemoryRefStore {
    fn read_value(&self, name: &str) -> Result<Option<RefValue>> {
        validate_ref_name(name)?;
        let refs = self.refs.read().map_err(poisoned)?;
        Ok(refs.get(name).cloned())
    }

    fn write_value(&self, name: &str, value: &RefValue) -> Result<()> {
        validate_ref_name(name)?;
        let mut refs = self.refs.write().map_err(poisoned)?;
        refs.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn names_under(&self, prefix: &str) -> Result<Vec<String>> {
        validate_ref_name(prefix)?;
        let dir = format!("{prefix}/");
        let refs = self.refs.read().map_err(poisoned)?;
        Ok(refs
            .keys()
            .filter(|name| name.starts_with(&dir))
            .cloned()
            .collect())
    }
}
