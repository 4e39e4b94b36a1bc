use std::borrow::Cow;

use pvc_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::kvlm::Kvlm;

/// A commit: KVLM headers naming a root tree and parents, plus a message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    /// Wrap already-parsed headers.
    pub fn from_kvlm(kvlm: Kvlm) -> Self {
        Self { kvlm }
    }

    /// Parse a commit payload.
    pub fn parse(raw: &[u8]) -> StoreResult<Self> {
        Kvlm::parse(raw).map(Self::from_kvlm)
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    /// Underlying header list.
    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    /// The root tree of this snapshot.
    pub fn tree(&self) -> StoreResult<ObjectId> {
        let raw = self
            .kvlm
            .get_first(b"tree")
            .ok_or_else(|| StoreError::malformed("commit has no tree header"))?;
        parse_id(raw)
    }

    /// Parent commits in header order. Empty for a root commit.
    pub fn parents(&self) -> StoreResult<Vec<ObjectId>> {
        self.kvlm
            .get(b"parent")
            .unwrap_or_default()
            .iter()
            .map(|raw| parse_id(raw))
            .collect()
    }

    pub fn is_root(&self) -> bool {
        self.kvlm.get(b"parent").is_none()
    }

    pub fn author(&self) -> Option<Cow<'_, str>> {
        self.kvlm.get_first(b"author").map(String::from_utf8_lossy)
    }

    pub fn committer(&self) -> Option<Cow<'_, str>> {
        self.kvlm.get_first(b"committer").map(String::from_utf8_lossy)
    }

    pub fn message(&self) -> &[u8] {
        self.kvlm.message()
    }

    /// First line of the message.
    pub fn summary(&self) -> String {
        let message = String::from_utf8_lossy(self.message());
        message.lines().next().unwrap_or_default().trim_end().to_string()
    }
}

fn parse_id(raw: &[u8]) -> StoreResult<ObjectId> {
    let hex = std::str::from_utf8(raw)
        .map_err(|_| StoreError::malformed("commit hash header is not ASCII"))?;
    Ok(ObjectId::from_hex(hex.trim())?)
}

/// Incremental construction of a [`Commit`] with headers in conventional
/// order: `tree`, `parent`*, `author`, `committer`.
#[derive(Debug, Default)]
pub struct CommitBuilder {
    tree: Option<ObjectId>,
    parents: Vec<ObjectId>,
    author: Option<String>,
    committer: Option<String>,
    extra: Vec<(String, String)>,
    message: String,
}

impl CommitBuilder {
    pub fn new(tree: ObjectId) -> Self {
        Self {
            tree: Some(tree),
            ..Default::default()
        }
    }

    pub fn parent(mut self, parent: ObjectId) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn committer(mut self, committer: impl Into<String>) -> Self {
        self.committer = Some(committer.into());
        self
    }

    /// Extra header appended after the standard ones.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn build(self) -> Commit {
        let mut kvlm = Kvlm::new();
        if let Some(tree) = self.tree {
            kvlm.push("tree", tree.to_hex());
        }
        for parent in &self.parents {
            kvlm.push("parent", parent.to_hex());
        }
        if let Some(author) = self.author {
            kvlm.push("author", author);
        }
        if let Some(committer) = self.committer {
            kvlm.push("committer", committer);
        }
        for (key, value) in self.extra {
            kvlm.push(key, value);
        }
        kvlm.set_message(self.message);
        Commit::from_kvlm(kvlm)
    }
}
