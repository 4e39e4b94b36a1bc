//! `ls-tree` style listings of stored trees.

use std::fmt;

use pvc_store::{EntryMode, ObjectStore, StoreError, TreeEntry};
use pvc_types::{ObjectId, ObjectKind};
use serde::Serialize;

use crate::checkout::read_tree;
use crate::error::CheckoutResult;

/// One listed entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    /// Six-digit mode.
    pub mode: String,
    pub kind: ObjectKind,
    pub id: ObjectId,
    /// Slash-joined path relative to the listed tree.
    pub path: String,
}

impl fmt::Display for TreeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}\t{}", self.mode, self.kind, self.id, self.path)
    }
}

/// List the entries of `tree` in stored order.
///
/// Each row's type is that of the object the entry points at. When
/// `recursive` is set, subtrees are expanded in place instead of listed,
/// and only their leaves appear.
pub fn ls_tree<S: ObjectStore + ?Sized>(
    store: &S,
    tree: ObjectId,
    recursive: bool,
) -> CheckoutResult<Vec<TreeRow>> {
    let root = read_tree(store, tree)?;
    let mut rows = Vec::new();
    let mut pending: Vec<(String, TreeEntry)> = Vec::new();
    push_entries(&mut pending, "", root.entries);

    while let Some((path, entry)) = pending.pop() {
        let kind = entry_kind(store, &entry.mode, &entry.object_id)?;
        if recursive && kind == ObjectKind::Tree {
            let subtree = read_tree(store, entry.object_id)?;
            push_entries(&mut pending, &path, subtree.entries);
            continue;
        }
        rows.push(TreeRow {
            mode: entry.mode.padded(),
            kind,
            id: entry.object_id,
            path,
        });
    }
    Ok(rows)
}

// Reverse so entries pop in stored order.
fn push_entries(pending: &mut Vec<(String, TreeEntry)>, prefix: &str, entries: Vec<TreeEntry>) {
    for entry in entries.into_iter().rev() {
        let name = entry.name_lossy();
        let path = if prefix.is_empty() {
            name.into_owned()
        } else {
            format!("{prefix}/{name}")
        };
        pending.push((path, entry));
    }
}

/// The stored object's kind, falling back to the mode for gitlinks whose
/// commit lives in another repository.
fn entry_kind<S: ObjectStore + ?Sized>(
    store: &S,
    mode: &EntryMode,
    id: &ObjectId,
) -> CheckoutResult<ObjectKind> {
    match store.read_raw(id) {
        Ok((kind, _)) => Ok(kind),
        Err(StoreError::ObjectNotFound(_)) if mode.implied_kind() == ObjectKind::Commit => {
            Ok(ObjectKind::Commit)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvc_store::{Blob, InMemoryObjectStore, Object, Tree};

    fn fixture(store: &InMemoryObjectStore) -> (ObjectId, ObjectId, ObjectId, ObjectId) {
        let file = store.write(&Object::Blob(Blob::new(&b"hi\n"[..])), true).unwrap();
        let inner = store.write(&Object::Blob(Blob::new(&b"inner\n"[..])), true).unwrap();
        let sub = store
            .write(
                &Object::Tree(Tree::new(vec![TreeEntry::new(
                    EntryMode::regular(),
                    "inner.txt",
                    inner,
                )])),
                true,
            )
            .unwrap();
        let root = store
            .write(
                &Object::Tree(Tree::new(vec![
                    TreeEntry::new(EntryMode::regular(), "file.txt", file),
                    TreeEntry::new(EntryMode::directory(), "sub", sub),
                ])),
                true,
            )
            .unwrap();
        (root, file, sub, inner)
    }

    #[test]
    fn flat_listing_format() {
        let store = InMemoryObjectStore::new();
        let (root, file, sub, _) = fixture(&store);

        let rows: Vec<String> = ls_tree(&store, root, false)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            rows,
            vec![
                format!("100644 blob {file}\tfile.txt"),
                format!("040000 tree {sub}\tsub"),
            ]
        );
    }

    #[test]
    fn recursive_listing_expands_subtrees() {
        let store = InMemoryObjectStore::new();
        let (root, _, _, inner) = fixture(&store);

        let rows = ls_tree(&store, root, true).unwrap();
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["file.txt", "sub/inner.txt"]);
        assert_eq!(rows[1].id, inner);
        assert_eq!(rows[1].kind, ObjectKind::Blob);
    }

    #[test]
    fn type_comes_from_the_object() {
        let store = InMemoryObjectStore::new();
        let sub = store.write(&Object::Tree(Tree::empty()), true).unwrap();
        // A tree filed under a regular-file mode still lists as a tree.
        let root = store
            .write(
                &Object::Tree(Tree::new(vec![TreeEntry::new(EntryMode::regular(), "odd", sub)])),
                true,
            )
            .unwrap();
        let rows = ls_tree(&store, root, false).unwrap();
        assert_eq!(rows[0].kind, ObjectKind::Tree);
        assert_eq!(rows[0].mode, "100644");
    }

    #[test]
    fn missing_gitlink_target_lists_as_commit() {
        let store = InMemoryObjectStore::new();
        let mode = EntryMode::parse(EntryMode::GITLINK.as_bytes()).unwrap();
        let target = ObjectId::from_hash([0xcc; 20]);
        let root = store
            .write(
                &Object::Tree(Tree::new(vec![TreeEntry::new(mode, "lib", target)])),
                true,
            )
            .unwrap();
        let rows = ls_tree(&store, root, true).unwrap();
        assert_eq!(rows[0].to_string(), format!("160000 commit {target}\tlib"));
    }

    #[test]
    fn listing_a_blob_fails() {
        let store = InMemoryObjectStore::new();
        let (_, file, _, _) = fixture(&store);
        assert!(ls_tree(&store, file, false).is_err());
    }
}
