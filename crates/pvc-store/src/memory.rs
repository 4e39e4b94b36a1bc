use std::collections::HashMap;
use std::sync::RwLock;

use pvc_crypto::ContentHasher;
use pvc_types::{ObjectId, ObjectKind};

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding, or as a cache in front of a slower
/// store. Payloads are held uncompressed behind a `RwLock`.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, (ObjectKind, Vec<u8>)>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total payload bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|(_, payload)| payload.len() as u64)
            .sum()
    }

    /// Return a sorted list of all object ids in the store.
    pub fn all_ids(&self) -> Vec<ObjectId> {
        let map = self.objects.read().expect("lock poisoned");
        let mut ids: Vec<ObjectId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read_raw(&self, id: &ObjectId) -> StoreResult<(ObjectKind, Vec<u8>)> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(id).cloned().ok_or(StoreError::ObjectNotFound(*id))
    }

    fn write_raw(&self, kind: ObjectKind, payload: &[u8], persist: bool) -> StoreResult<ObjectId> {
        let id = ContentHasher::new(kind).hash(payload);
        if persist {
            let mut map = self.objects.write().expect("lock poisoned");
            // Same id means same content.
            map.entry(id).or_insert_with(|| (kind, payload.to_vec()));
        }
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn ids_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>> {
        Ok(self
            .all_ids()
            .into_iter()
            .filter(|id| id.to_hex().starts_with(prefix))
            .collect())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}
