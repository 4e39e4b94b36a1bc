//! Materialise a stored tree into a directory.
//!
//! Trees become directories and blobs become files holding their payload
//! verbatim. The walk uses an explicit stack of pending directories, so
//! nesting depth is bounded by the heap rather than the call stack.
//!
//! There is no rollback: if a read or write fails midway, whatever was
//! already written stays on disk.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use pvc_store::{Object, ObjectStore, Tree, TreeEntry};
use pvc_types::{ObjectId, ObjectKind};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, CheckoutResult};

/// What a checkout wrote.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CheckoutReport {
    pub files_written: usize,
    pub dirs_created: usize,
    pub bytes_written: u64,
    /// Gitlink entries, which name commits in other repositories.
    pub skipped: usize,
}

/// Write the contents of `tree` into `dest`.
///
/// `dest` must either not exist (it is created) or be an empty directory.
pub fn checkout<S: ObjectStore + ?Sized>(
    store: &S,
    tree: ObjectId,
    dest: &Path,
) -> CheckoutResult<CheckoutReport> {
    let root = read_tree(store, tree)?;
    prepare_destination(dest)?;

    let mut report = CheckoutReport::default();
    let mut pending: Vec<(Tree, PathBuf)> = vec![(root, dest.to_path_buf())];

    while let Some((tree, dir)) = pending.pop() {
        let mut seen = HashSet::with_capacity(tree.entries.len());
        for entry in &tree.entries {
            let name = safe_entry_name(entry)?;
            if !seen.insert(name) {
                return Err(CheckoutError::UnsafeEntryName {
                    name: name.to_string(),
                    reason: format!("appears more than once in {}", dir.display()),
                });
            }
            let path = dir.join(name);

            if entry.mode.implied_kind() == ObjectKind::Commit {
                warn!(path = %path.display(), target = %entry.object_id.short_hex(), "skipping gitlink entry");
                report.skipped += 1;
                continue;
            }

            match store.read(&entry.object_id)? {
                Object::Tree(subtree) => {
                    fs::create_dir_all(&path)?;
                    report.dirs_created += 1;
                    pending.push((subtree, path));
                }
                Object::Blob(blob) => {
                    fs::write(&path, &blob.data)?;
                    debug!(path = %path.display(), size = blob.data.len(), "wrote file");
                    report.files_written += 1;
                    report.bytes_written += blob.data.len() as u64;
                }
                Object::Commit(_) => {
                    warn!(path = %path.display(), target = %entry.object_id.short_hex(), "skipping commit entry");
                    report.skipped += 1;
                }
            }
        }
    }

    info!(
        tree = %tree.short_hex(),
        dest = %dest.display(),
        files = report.files_written,
        dirs = report.dirs_created,
        bytes = report.bytes_written,
        "checkout complete"
    );
    Ok(report)
}

pub(crate) fn read_tree<S: ObjectStore + ?Sized>(store: &S, id: ObjectId) -> CheckoutResult<Tree> {
    match store.read(&id)? {
        Object::Tree(tree) => Ok(tree),
        other => Err(CheckoutError::NotATree {
            id,
            kind: other.kind(),
        }),
    }
}

fn prepare_destination(dest: &Path) -> CheckoutResult<()> {
    if dest.exists() {
        if !dest.is_dir() {
            return Err(CheckoutError::CheckoutPrecondition {
                path: dest.to_path_buf(),
                reason: "not a directory".into(),
            });
        }
        if fs::read_dir(dest)?.next().is_some() {
            return Err(CheckoutError::CheckoutPrecondition {
                path: dest.to_path_buf(),
                reason: "directory is not empty".into(),
            });
        }
        return Ok(());
    }
    fs::create_dir_all(dest)?;
    Ok(())
}

/// The entry name as a single path component, or an error if writing it
/// could land anywhere other than directly inside its parent.
pub(crate) fn safe_entry_name(entry: &TreeEntry) -> CheckoutResult<&str> {
    let unsafe_name = |reason: &str| CheckoutError::UnsafeEntryName {
        name: entry.name_lossy().into_owned(),
        reason: reason.to_string(),
    };
    let name = std::str::from_utf8(&entry.name).map_err(|_| unsafe_name("not valid UTF-8"))?;
    if name.is_empty() {
        return Err(unsafe_name("empty name"));
    }
    if name == "." || name == ".." {
        return Err(unsafe_name("refers to a directory itself"));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(unsafe_name("contains a path separator"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvc_store::{Blob, EntryMode, InMemoryObjectStore};

    fn blob(store: &InMemoryObjectStore, data: &[u8]) -> ObjectId {
        store.write(&Object::Blob(Blob::new(data)), true).unwrap()
    }

    fn tree(store: &InMemoryObjectStore, entries: Vec<TreeEntry>) -> ObjectId {
        store.write(&Object::Tree(Tree::new(entries)), true).unwrap()
    }

    #[test]
    fn single_file_into_empty_dir() {
        let store = InMemoryObjectStore::new();
        let content = blob(&store, b"hello\n");
        let root = tree(
            &store,
            vec![TreeEntry::new(EntryMode::regular(), "test.txt", content)],
        );

        let dir = tempfile::tempdir().unwrap();
        let report = checkout(&store, root, dir.path()).unwrap();

        assert_eq!(fs::read(dir.path().join("test.txt")).unwrap(), b"hello\n");
        assert_eq!(report.files_written, 1);
        assert_eq!(report.bytes_written, 6);
        assert_eq!(report.dirs_created, 0);
    }

    #[test]
    fn nested_directories_are_created() {
        let store = InMemoryObjectStore::new();
        let readme = blob(&store, b"# readme\n");
        let main = blob(&store, b"fn main() {}\n");
        let src = tree(
            &store,
            vec![TreeEntry::new(EntryMode::regular(), "main.rs", main)],
        );
        let root = tree(
            &store,
            vec![
                TreeEntry::new(EntryMode::regular(), "README.md", readme),
                TreeEntry::new(EntryMode::directory(), "src", src),
            ],
        );

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let report = checkout(&store, root, &dest).unwrap();

        assert_eq!(fs::read(dest.join("README.md")).unwrap(), b"# readme\n");
        assert_eq!(fs::read(dest.join("src/main.rs")).unwrap(), b"fn main() {}\n");
        assert_eq!(report.files_written, 2);
        assert_eq!(report.dirs_created, 1);
    }

    #[test]
    fn deep_nesting_uses_no_recursion() {
        let store = InMemoryObjectStore::new();
        let leaf = blob(&store, b"bottom");
        let mut current = tree(&store, vec![TreeEntry::new(EntryMode::regular(), "f", leaf)]);
        for _ in 0..100 {
            current = tree(
                &store,
                vec![TreeEntry::new(EntryMode::directory(), "d", current)],
            );
        }

        let dir = tempfile::tempdir().unwrap();
        let report = checkout(&store, current, dir.path()).unwrap();
        assert_eq!(report.dirs_created, 100);
        let deepest: PathBuf = std::iter::repeat("d").take(100).collect();
        assert_eq!(fs::read(dir.path().join(deepest).join("f")).unwrap(), b"bottom");
    }

    #[test]
    fn non_empty_destination_is_rejected() {
        let store = InMemoryObjectStore::new();
        let root = tree(&store, vec![]);
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("existing"), b"x").unwrap();

        assert!(matches!(
            checkout(&store, root, dir.path()).unwrap_err(),
            CheckoutError::CheckoutPrecondition { .. }
        ));
    }

    #[test]
    fn file_destination_is_rejected() {
        let store = InMemoryObjectStore::new();
        let root = tree(&store, vec![]);
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            checkout(&store, root, &file).unwrap_err(),
            CheckoutError::CheckoutPrecondition { .. }
        ));
    }

    #[test]
    fn blob_root_is_not_a_tree() {
        let store = InMemoryObjectStore::new();
        let id = blob(&store, b"data");
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            checkout(&store, id, dir.path()).unwrap_err(),
            CheckoutError::NotATree { kind: ObjectKind::Blob, .. }
        ));
    }

    #[test]
    fn escaping_names_are_rejected() {
        let store = InMemoryObjectStore::new();
        let payload = blob(&store, b"pwned");
        for bad in ["..", ".", "a/b", "", "a\\b"] {
            // Written raw: the store refuses to build an empty-named entry.
            let raw = Tree::new(vec![TreeEntry::new(EntryMode::regular(), bad, payload)]);
            let root = store
                .write_raw(ObjectKind::Tree, &raw.serialize(), true)
                .unwrap();
            let dir = tempfile::tempdir().unwrap();
            assert!(
                matches!(
                    checkout(&store, root, &dir.path().join("out")).unwrap_err(),
                    CheckoutError::UnsafeEntryName { .. }
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let store = InMemoryObjectStore::new();
        let first = blob(&store, b"first");
        let second = blob(&store, b"second");
        let root = tree(
            &store,
            vec![
                TreeEntry::new(EntryMode::regular(), "same.txt", first),
                TreeEntry::new(EntryMode::regular(), "same.txt", second),
            ],
        );

        let dir = tempfile::tempdir().unwrap();
        match checkout(&store, root, dir.path()).unwrap_err() {
            CheckoutError::UnsafeEntryName { name, .. } => assert_eq!(name, "same.txt"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read(dir.path().join("same.txt")).unwrap(), b"first");
    }

    #[test]
    fn missing_blob_is_store_error() {
        let store = InMemoryObjectStore::new();
        let root = tree(
            &store,
            vec![TreeEntry::new(
                EntryMode::regular(),
                "ghost",
                ObjectId::from_hash([0xaa; 20]),
            )],
        );
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            checkout(&store, root, dir.path()).unwrap_err(),
            CheckoutError::Store(pvc_store::StoreError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn gitlinks_are_skipped() {
        let store = InMemoryObjectStore::new();
        let mode = EntryMode::parse(EntryMode::GITLINK.as_bytes()).unwrap();
        let root = tree(
            &store,
            vec![TreeEntry::new(mode, "vendored", ObjectId::from_hash([0xbb; 20]))],
        );
        let dir = tempfile::tempdir().unwrap();
        let report = checkout(&store, root, dir.path()).unwrap();
        assert_eq!(report.skipped, 1);
        assert!(!dir.path().join("vendored").exists());
    }
}
