use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pvc_crypto::ContentHasher;
use pvc_types::{ObjectId, ObjectKind};
use tracing::debug;

use crate::codec::{self, DEFAULT_COMPRESSION};
use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Loose-object store on the local filesystem.
///
/// Each object lives in its own zlib-compressed file at
/// `<root>/<first two hex chars>/<remaining 38 hex chars>`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    compression: u32,
}

impl FsObjectStore {
    /// Open a store rooted at `root` (normally `.pvc/objects`).
    ///
    /// The directory is not created here; fan-out directories are created
    /// lazily on the first write into them.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_compression(root, DEFAULT_COMPRESSION)
    }

    /// Like [`FsObjectStore::new`] with an explicit zlib level (0-9).
    pub fn with_compression(root: impl Into<PathBuf>, compression: u32) -> Self {
        Self {
            root: root.into(),
            compression: compression.min(9),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the object with `id` is (or would be) stored.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.fan_out();
        self.root.join(dir).join(file)
    }

    fn write_file(&self, path: &Path, compressed: &[u8]) -> StoreResult<()> {
        let dir = path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "object path has no parent"))?;
        fs::create_dir_all(dir)?;

        // Write to a temp file in the same directory and rename into place, so
        // readers never observe a partially written object.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(compressed)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(path) {
            Ok(_) => Ok(()),
            // A concurrent writer got there first with identical content.
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err.error.into()),
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn read_raw(&self, id: &ObjectId) -> StoreResult<(ObjectKind, Vec<u8>)> {
        let path = self.object_path(id);
        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::ObjectNotFound(*id));
            }
            Err(err) => return Err(err.into()),
        };

        let record = codec::decompress(&compressed)?;
        let computed = ContentHasher::hash_record(&record);
        if computed != *id {
            return Err(StoreError::HashMismatch {
                expected: *id,
                computed,
            });
        }

        let (kind, payload) = codec::decode(&record)?;
        debug!(object = %id.short_hex(), kind = %kind, size = payload.len(), "read object");
        Ok((kind, payload.to_vec()))
    }

    fn write_raw(&self, kind: ObjectKind, payload: &[u8], persist: bool) -> StoreResult<ObjectId> {
        let record = codec::encode(kind, payload);
        let id = ContentHasher::hash_record(&record);
        if !persist {
            return Ok(id);
        }

        let path = self.object_path(&id);
        if path.is_file() {
            debug!(object = %id.short_hex(), "object already stored, skipping write");
            return Ok(id);
        }

        let compressed = codec::compress(&record, self.compression)?;
        self.write_file(&path, &compressed)?;
        debug!(
            object = %id.short_hex(),
            kind = %kind,
            size = payload.len(),
            compressed = compressed.len(),
            "wrote object"
        );
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }

    fn ids_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectId>> {
        // The first two characters name the fan-out directory, so they must
        // be single-byte hex digits before the prefix is split.
        if prefix.len() < 2 || !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StoreError::InvalidPrefix(prefix.to_string()));
        }
        let (dir, rest) = prefix.split_at(2);
        let fan_dir = self.root.join(dir);

        let entries = match fs::read_dir(&fan_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(rest) {
                continue;
            }
            // Stray files (temp files from an interrupted write) are skipped.
            if let Ok(id) = ObjectId::from_hex(&format!("{dir}{name}")) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}
