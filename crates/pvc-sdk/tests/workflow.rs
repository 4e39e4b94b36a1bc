//! End-to-end: build history with the object API, then read it back through
//! the repository handle the way the CLI does.

use std::fs;

use pvc_sdk::{
    Blob, CommitBuilder, EntryMode, Object, ObjectKind, ObjectStore, RefStore, Repository, SdkError,
    Tree, TreeEntry,
};

const AUTHOR: &str = "Ada Lovelace <ada@example.com> 1527025023 +0200";

fn write(repo: &Repository, object: Object) -> pvc_sdk::ObjectId {
    repo.objects().write(&object, true).unwrap()
}

#[test]
fn commit_checkout_and_log() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path().join("repo")).unwrap();

    // Fresh repository: HEAD names a branch with no commits yet.
    assert!(matches!(
        repo.rev_parse("HEAD", None).unwrap_err(),
        SdkError::Ref(_)
    ));

    let readme = write(&repo, Object::Blob(Blob::new(&b"# demo\n"[..])));
    let code = write(&repo, Object::Blob(Blob::new(&b"fn main() {}\n"[..])));
    let src = write(
        &repo,
        Object::Tree(Tree::new(vec![TreeEntry::new(EntryMode::regular(), "main.rs", code)])),
    );
    let root = write(
        &repo,
        Object::Tree(Tree::new(vec![
            TreeEntry::new(EntryMode::regular(), "README.md", readme),
            TreeEntry::new(EntryMode::directory(), "src", src),
        ])),
    );

    let first = write(
        &repo,
        Object::Commit(
            CommitBuilder::new(root)
                .author(AUTHOR)
                .committer(AUTHOR)
                .message("Initial commit\n")
                .build(),
        ),
    );
    let second = write(
        &repo,
        Object::Commit(
            CommitBuilder::new(root)
                .parent(first)
                .author(AUTHOR)
                .committer(AUTHOR)
                .message("Second commit\n")
                .build(),
        ),
    );
    repo.set_branch("master", second).unwrap();
    repo.refs().write_ref("refs/tags/v1", first).unwrap();

    // Names resolve through HEAD, branches, tags, and hash prefixes.
    assert_eq!(repo.rev_parse("HEAD", None).unwrap(), second);
    assert_eq!(repo.rev_parse("master", None).unwrap(), second);
    assert_eq!(repo.rev_parse("v1", None).unwrap(), first);
    assert_eq!(repo.rev_parse(&second.to_hex()[..8], None).unwrap(), second);
    assert_eq!(repo.rev_parse("HEAD", Some(ObjectKind::Tree)).unwrap(), root);

    // Everything survives a reopen.
    let repo = Repository::open(dir.path().join("repo")).unwrap();

    let (kind, payload) = repo.cat_file("HEAD", None).unwrap();
    assert_eq!(kind, ObjectKind::Commit);
    assert!(String::from_utf8(payload).unwrap().contains("Second commit"));

    let rows: Vec<String> = repo
        .ls_tree("HEAD", true)
        .unwrap()
        .iter()
        .map(|r| r.path.clone())
        .collect();
    assert_eq!(rows, vec!["README.md", "src/main.rs"]);

    let out = dir.path().join("checkout");
    let report = repo.checkout("HEAD", &out).unwrap();
    assert_eq!(report.files_written, 2);
    assert_eq!(fs::read(out.join("README.md")).unwrap(), b"# demo\n");
    assert_eq!(fs::read(out.join("src/main.rs")).unwrap(), b"fn main() {}\n");

    // A second checkout into the now non-empty directory is refused.
    assert!(matches!(
        repo.checkout("HEAD", &out).unwrap_err(),
        SdkError::Checkout(_)
    ));

    let history = repo.log("HEAD").unwrap();
    let summaries: Vec<&str> = history
        .linear_history(None)
        .iter()
        .map(|c| c.summary.as_str())
        .collect();
    assert_eq!(summaries, vec!["Second commit", "Initial commit"]);
    assert!(history.to_dot().contains(&format!("c_{second} -> c_{first};")));

    let refs = repo.show_ref().unwrap();
    assert_eq!(
        refs,
        vec![
            (second, "refs/heads/master".to_string()),
            (first, "refs/tags/v1".to_string()),
        ]
    );
}

#[test]
fn corrupted_object_is_detected_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    let good = repo.hash_object(&b"good"[..], ObjectKind::Blob, true).unwrap();
    let bad = repo.hash_object(&b"evil"[..], ObjectKind::Blob, true).unwrap();

    // File the wrong bytes under the good id.
    fs::copy(
        repo.objects().object_path(&bad),
        repo.objects().object_path(&good),
    )
    .unwrap();

    assert!(matches!(
        repo.cat_file(&good.to_hex(), None).unwrap_err(),
        SdkError::Store(pvc_store::StoreError::HashMismatch { .. })
    ));
}
