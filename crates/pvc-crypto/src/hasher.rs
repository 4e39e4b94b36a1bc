use pvc_types::{ObjectId, ObjectKind, HASH_LEN};
use sha1::{Digest, Sha1};

/// Kind-bound SHA-1 content hasher.
///
/// Each hasher carries the object kind whose header is prepended to every
/// hash computation, so a blob and a tree with identical payload bytes produce
/// different ids.
pub struct ContentHasher {
    kind: ObjectKind,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self {
        kind: ObjectKind::Blob,
    };
    /// Hasher for tree objects.
    pub const TREE: Self = Self {
        kind: ObjectKind::Tree,
    };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self {
        kind: ObjectKind::Commit,
    };

    /// Hasher for an arbitrary kind.
    pub const fn new(kind: ObjectKind) -> Self {
        Self { kind }
    }

    /// Hash a payload as if framed with this hasher's kind.
    ///
    /// Equivalent to `hash_record(encode(kind, payload))` without building the
    /// framed buffer.
    pub fn hash(&self, payload: &[u8]) -> ObjectId {
        let mut hasher = Sha1::new();
        hasher.update(self.kind.header(payload.len()));
        hasher.update(payload);
        ObjectId::from_hash(hasher.finalize().into())
    }

    /// Verify that a payload produces the expected object id.
    pub fn verify(&self, payload: &[u8], expected: &ObjectId) -> bool {
        self.hash(payload) == *expected
    }

    /// Hash an already framed record.
    pub fn hash_record(record: &[u8]) -> ObjectId {
        ObjectId::from_hash(Self::raw_hash(record))
    }

    /// Raw SHA-1 with no framing (for low-level use).
    pub fn raw_hash(data: &[u8]) -> [u8; HASH_LEN] {
        Sha1::digest(data).into()
    }

    /// The object kind used by this hasher.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }
}
