use pvc_types::{ObjectId, ObjectKind, HEX_LEN};

use crate::error::{StoreError, StoreResult};
use crate::object::Object;

/// Shortest abbreviated hash accepted by [`ObjectStore::resolve_prefix`].
pub const MIN_PREFIX_LEN: usize = 4;

/// Content-addressed object store.
///
/// All implementations must satisfy these invariants:
/// - Objects are immutable once written. The same content always produces the
///   same id, so writing an existing id is a no-op.
/// - Ids are computed from the framed record, never taken from the caller.
/// - Concurrent reads are always safe (objects are immutable).
/// - All I/O errors are propagated, never silently ignored.
pub trait ObjectStore: Send + Sync {
    /// Read the kind and payload stored under `id`.
    ///
    /// Fails with [`StoreError::ObjectNotFound`] if nothing is stored there.
    fn read_raw(&self, id: &ObjectId) -> StoreResult<(ObjectKind, Vec<u8>)>;

    /// Frame and hash a payload; when `persist` is set, store it.
    ///
    /// The id is returned either way, so `persist = false` is a pure hash
    /// computation with no I/O.
    fn write_raw(&self, kind: ObjectKind, payload: &[u8], persist: bool) -> StoreResult<ObjectId>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// All stored ids whose hex form starts with `prefix` (lowercase hex),
    /// in ascending order.
    fn ids_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>>;

    /// Read and decode an object.
    fn read(&self, id: &ObjectId) -> StoreResult<Object> {
        let (kind, payload) = self.read_raw(id)?;
        Object::deserialize(kind, &payload)
    }

    /// Validate, serialize and write an object; see [`ObjectStore::write_raw`].
    ///
    /// Trees whose entries could not be parsed back are rejected with
    /// [`StoreError::MalformedObject`] before anything is hashed.
    fn write(&self, object: &Object, persist: bool) -> StoreResult<ObjectId> {
        object.validate()?;
        self.write_raw(object.kind(), &object.serialize(), persist)
    }

    /// Expand an abbreviated hash to the unique stored id it names.
    fn resolve_prefix(&self, prefix: &str) -> StoreResult<ObjectId> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.len() < MIN_PREFIX_LEN
            || prefix.len() > HEX_LEN
            || !prefix.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(StoreError::InvalidPrefix(prefix));
        }
        if prefix.len() == HEX_LEN {
            let id = ObjectId::from_hex(&prefix)?;
            return if self.exists(&id)? {
                Ok(id)
            } else {
                Err(StoreError::ObjectNotFound(id))
            };
        }

        let mut matches = self.ids_with_prefix(&prefix)?;
        match matches.len() {
            0 => Err(StoreError::PrefixNotFound(prefix)),
            1 => Ok(matches.remove(0)),
            count => Err(StoreError::AmbiguousPrefix { prefix, count }),
        }
    }
}
