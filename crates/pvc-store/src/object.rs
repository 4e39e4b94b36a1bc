use pvc_crypto::ContentHasher;
use pvc_types::{ObjectId, ObjectKind};

use crate::codec;
use crate::commit::Commit;
use crate::error::StoreResult;
use crate::tree::Tree;

/// Raw content object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

/// A decoded object of any kind.
///
/// Objects are transient views: the store hands out a fresh value on every
/// read, derived from the stored bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    /// Decode a payload of the given kind.
    pub fn deserialize(kind: ObjectKind, payload: &[u8]) -> StoreResult<Self> {
        Ok(match kind {
            ObjectKind::Blob => Self::Blob(Blob::new(payload)),
            ObjectKind::Tree => Self::Tree(Tree::parse(payload)?),
            ObjectKind::Commit => Self::Commit(Commit::parse(payload)?),
        })
    }

    /// Check that the object serializes to a payload that parses back.
    /// Only trees can be built in a shape their own format cannot express.
    pub fn validate(&self) -> StoreResult<()> {
        match self {
            Self::Tree(tree) => tree.validate(),
            Self::Blob(_) | Self::Commit(_) => Ok(()),
        }
    }

    /// Encode the payload (without the record header).
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Self::Blob(blob) => blob.data.clone(),
            Self::Tree(tree) => tree.serialize(),
            Self::Commit(commit) => commit.serialize(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Blob(_) => ObjectKind::Blob,
            Self::Tree(_) => ObjectKind::Tree,
            Self::Commit(_) => ObjectKind::Commit,
        }
    }

    /// The framed record `<type> <len>\0<payload>`.
    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self.kind(), &self.serialize())
    }

    /// Content-addressed id, always recomputed from the encoded bytes.
    pub fn id(&self) -> ObjectId {
        ContentHasher::new(self.kind()).hash(&self.serialize())
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Self::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            Self::Commit(commit) => Some(commit),
            _ => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Self::Commit(commit)
    }
}
