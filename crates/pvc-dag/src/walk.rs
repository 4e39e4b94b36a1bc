//! Iterative commit-ancestry traversal.
//!
//! [`Ancestors`] expands every commit reachable from a starting point
//! exactly once, depth-first along first parents, using an explicit stack so
//! deep histories cannot overflow the call stack. [`walk`] turns that into
//! the child -> parent edge list.

use std::collections::HashSet;

use pvc_store::{Commit, Object, ObjectStore};
use pvc_types::ObjectId;
use serde::Serialize;
use tracing::debug;

use crate::error::{DagError, DagResult};

/// A `child -> parent` link between two commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub child: ObjectId,
    pub parent: ObjectId,
}

/// One expanded commit.
#[derive(Clone, Debug)]
pub struct Visit {
    pub id: ObjectId,
    pub commit: Commit,
    /// Parents in header order.
    pub parents: Vec<ObjectId>,
}

impl Visit {
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.parents.iter().map(|parent| Edge {
            child: self.id,
            parent: *parent,
        })
    }
}

/// Iterator over the commits reachable from a starting commit.
///
/// Yields each commit the first time it is reached. After an error the
/// iterator is exhausted.
pub struct Ancestors<'a, S: ?Sized> {
    store: &'a S,
    stack: Vec<ObjectId>,
    visited: HashSet<ObjectId>,
}

impl<'a, S: ObjectStore + ?Sized> Ancestors<'a, S> {
    pub fn new(store: &'a S, start: ObjectId) -> Self {
        Self::with_visited(store, start, HashSet::new())
    }

    /// Start with some commits already marked as seen; they and anything
    /// reachable only through them are skipped.
    pub fn with_visited(store: &'a S, start: ObjectId, visited: HashSet<ObjectId>) -> Self {
        Self {
            store,
            stack: vec![start],
            visited,
        }
    }

    /// Hand back the visited set, including everything expanded so far.
    pub fn into_visited(self) -> HashSet<ObjectId> {
        self.visited
    }

    fn expand(&mut self, id: ObjectId) -> DagResult<Visit> {
        let commit = match self.store.read(&id)? {
            Object::Commit(commit) => commit,
            other => {
                return Err(DagError::NotACommit {
                    id,
                    kind: other.kind(),
                })
            }
        };
        let parents = commit.parents().map_err(|err| DagError::MalformedParent {
            commit: id,
            reason: err.to_string(),
        })?;

        // Reverse so the first parent is expanded next.
        for parent in parents.iter().rev() {
            if !self.visited.contains(parent) {
                self.stack.push(*parent);
            }
        }
        debug!(commit = %id.short_hex(), parents = parents.len(), "expanded commit");
        Ok(Visit {
            id,
            commit,
            parents,
        })
    }
}

impl<S: ObjectStore + ?Sized> Iterator for Ancestors<'_, S> {
    type Item = DagResult<Visit>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if !self.visited.insert(id) {
                continue;
            }
            let visit = self.expand(id);
            if visit.is_err() {
                self.stack.clear();
            }
            return Some(visit);
        }
        None
    }
}

/// Collect the `child -> parent` edges of every commit reachable from
/// `root` that is not already in `visited`.
///
/// Root commits contribute no edges. An edge to an already visited parent
/// is still emitted, but that parent is not expanded again. `visited` is
/// updated with every commit expanded.
pub fn walk<S: ObjectStore + ?Sized>(
    store: &S,
    root: ObjectId,
    visited: &mut HashSet<ObjectId>,
) -> DagResult<Vec<Edge>> {
    let mut ancestors = Ancestors::with_visited(store, root, std::mem::take(visited));
    let mut edges = Vec::new();
    let mut result = Ok(());
    for visit in ancestors.by_ref() {
        match visit {
            Ok(visit) => edges.extend(visit.edges()),
            Err(err) => {
                result = Err(err);
                break;
            }
        }
    }
    *visited = ancestors.into_visited();
    result.map(|()| edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvc_store::{Blob, CommitBuilder, InMemoryObjectStore, Tree};

    fn commit(store: &InMemoryObjectStore, parents: &[ObjectId], message: &str) -> ObjectId {
        let tree = store.write(&Object::Tree(Tree::empty()), true).unwrap();
        let commit = parents
            .iter()
            .fold(CommitBuilder::new(tree), |b, p| b.parent(*p))
            .author("Test <test@example.com> 0 +0000")
            .message(format!("{message}\n"))
            .build();
        store.write(&Object::Commit(commit), true).unwrap()
    }

    #[test]
    fn root_commit_has_no_edges() {
        let store = InMemoryObjectStore::new();
        let root = commit(&store, &[], "root");
        let mut visited = HashSet::new();
        assert!(walk(&store, root, &mut visited).unwrap().is_empty());
        assert!(visited.contains(&root));
    }

    #[test]
    fn linear_chain() {
        let store = InMemoryObjectStore::new();
        let a = commit(&store, &[], "a");
        let b = commit(&store, &[a], "b");
        let c = commit(&store, &[b], "c");

        let edges = walk(&store, c, &mut HashSet::new()).unwrap();
        assert_eq!(
            edges,
            vec![
                Edge { child: c, parent: b },
                Edge { child: b, parent: a },
            ]
        );
    }

    #[test]
    fn diamond_expands_shared_ancestor_once() {
        let store = InMemoryObjectStore::new();
        let a = commit(&store, &[], "a");
        let b = commit(&store, &[a], "b");
        let c = commit(&store, &[a], "c");
        let d = commit(&store, &[b, c], "merge");

        let visits: Vec<ObjectId> = Ancestors::new(&store, d)
            .map(|v| v.unwrap().id)
            .collect();
        assert_eq!(visits, vec![d, b, a, c]);

        let edges = walk(&store, d, &mut HashSet::new()).unwrap();
        assert_eq!(edges.len(), 4);
        assert!(edges.contains(&Edge { child: d, parent: b }));
        assert!(edges.contains(&Edge { child: d, parent: c }));
        assert!(edges.contains(&Edge { child: b, parent: a }));
        assert!(edges.contains(&Edge { child: c, parent: a }));
    }

    #[test]
    fn visited_commits_are_not_expanded() {
        let store = InMemoryObjectStore::new();
        let a = commit(&store, &[], "a");
        let b = commit(&store, &[a], "b");
        let c = commit(&store, &[b], "c");

        let mut visited = HashSet::from([b]);
        let edges = walk(&store, c, &mut visited).unwrap();
        assert_eq!(edges, vec![Edge { child: c, parent: b }]);
        assert!(!visited.contains(&a));
    }

    #[test]
    fn long_history_does_not_recurse() {
        let store = InMemoryObjectStore::new();
        let mut tip = commit(&store, &[], "0");
        for i in 1..5_000 {
            tip = commit(&store, &[tip], &i.to_string());
        }
        let edges = walk(&store, tip, &mut HashSet::new()).unwrap();
        assert_eq!(edges.len(), 4_999);
    }

    #[test]
    fn blob_is_not_a_commit() {
        let store = InMemoryObjectStore::new();
        let blob = store.write(&Object::Blob(Blob::new(&b"x"[..])), true).unwrap();
        assert!(matches!(
            walk(&store, blob, &mut HashSet::new()).unwrap_err(),
            DagError::NotACommit { id, .. } if id == blob
        ));
    }

    #[test]
    fn missing_parent_is_store_error() {
        let store = InMemoryObjectStore::new();
        let ghost = ObjectId::from_hash([0xee; 20]);
        let tip = commit(&store, &[ghost], "orphan");
        let mut visited = HashSet::new();
        let err = walk(&store, tip, &mut visited).unwrap_err();
        assert!(matches!(err, DagError::Store(pvc_store::StoreError::ObjectNotFound(id)) if id == ghost));
        assert!(visited.contains(&tip));
    }

    #[test]
    fn malformed_parent_header() {
        let store = InMemoryObjectStore::new();
        let payload = format!("tree {}\nparent nothex\n\nmsg\n", ObjectId::from_hash([1; 20]));
        let id = store
            .write_raw(pvc_types::ObjectKind::Commit, payload.as_bytes(), true)
            .unwrap();
        assert!(matches!(
            walk(&store, id, &mut HashSet::new()).unwrap_err(),
            DagError::MalformedParent { commit, .. } if commit == id
        ));
    }
}
