//! Reference resolution and listing over any [`RefStore`].

use std::collections::HashSet;

use pvc_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::traits::RefStore;
use crate::types::{RefTree, RefValue};

/// Longest chain of symbolic refs followed before giving up.
pub const MAX_SYMREF_DEPTH: usize = 64;

/// Follow `name` through symbolic refs until a direct hash is found.
///
/// Each hop is recorded; returning to an already visited ref fails with
/// [`RefError::ReferenceCycle`] and a chain of more than
/// [`MAX_SYMREF_DEPTH`] hops fails with [`RefError::ReferenceDepthExceeded`].
pub fn resolve<S: RefStore + ?Sized>(store: &S, name: &str) -> Result<ObjectId> {
    let mut current = name.to_string();
    let mut visited = HashSet::new();
    let mut chain = Vec::new();

    loop {
        if !visited.insert(current.clone()) {
            chain.push(current);
            return Err(RefError::ReferenceCycle {
                name: name.to_string(),
                chain,
            });
        }
        if chain.len() > MAX_SYMREF_DEPTH {
            return Err(RefError::ReferenceDepthExceeded {
                name: name.to_string(),
                max: MAX_SYMREF_DEPTH,
            });
        }

        match store.read_value(&current)? {
            None => {
                return Err(RefError::ReferenceResolutionFailure {
                    name: name.to_string(),
                    missing: current,
                });
            }
            Some(RefValue::Direct(id)) => {
                debug!(reference = name, hops = chain.len(), target = %id.short_hex(), "resolved ref");
                return Ok(id);
            }
            Some(RefValue::Symbolic(target)) => {
                chain.push(std::mem::replace(&mut current, target));
            }
        }
    }
}

/// Resolve every ref under `prefix` into a tree keyed by path component.
///
/// Any ref that fails to resolve fails the whole listing, with the same
/// error [`resolve`] gives for it.
pub fn list<S: RefStore + ?Sized>(store: &S, prefix: &str) -> Result<RefTree> {
    let mut tree = RefTree::new();
    for name in store.names_under(prefix)? {
        let relative = name
            .strip_prefix(prefix)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(&name);
        tree.insert(relative, resolve(store, &name)?);
    }
    Ok(tree)
}
