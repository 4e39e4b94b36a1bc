//! Tree objects: the binary directory listing format.
//!
//! Each entry is laid out as
//!
//! ```text
//! <mode: 5 or 6 ascii octal digits> 0x20 <name bytes> 0x00 <20 raw hash bytes>
//! ```
//!
//! and entries are concatenated with no separator or count.

use std::borrow::Cow;
use std::fmt;

use pvc_types::{ObjectId, ObjectKind, HASH_LEN};

use crate::error::{StoreError, StoreResult};

/// File mode of a tree entry, kept as the ASCII digits found on disk.
///
/// Modes are not normalized: a tree written with `40000` is re-serialized with
/// `40000`, which keeps the object id stable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryMode(String);

impl EntryMode {
    pub const REGULAR: &'static str = "100644";
    pub const EXECUTABLE: &'static str = "100755";
    pub const SYMLINK: &'static str = "120000";
    pub const DIRECTORY: &'static str = "40000";
    pub const GITLINK: &'static str = "160000";

    /// Normal file.
    pub fn regular() -> Self {
        Self(Self::REGULAR.into())
    }

    /// Executable file.
    pub fn executable() -> Self {
        Self(Self::EXECUTABLE.into())
    }

    /// Subtree.
    pub fn directory() -> Self {
        Self(Self::DIRECTORY.into())
    }

    /// Validate raw mode digits: 5 or 6 octal ASCII digits.
    pub fn parse(raw: &[u8]) -> StoreResult<Self> {
        if raw.len() != 5 && raw.len() != 6 {
            return Err(StoreError::malformed(format!(
                "tree entry mode must be 5 or 6 characters, got {}",
                raw.len()
            )));
        }
        if !raw.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return Err(StoreError::malformed(format!(
                "tree entry mode is not octal: {:?}",
                String::from_utf8_lossy(raw)
            )));
        }
        // Octal digits are ASCII.
        Ok(Self(String::from_utf8_lossy(raw).into_owned()))
    }

    /// The digits exactly as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Six-digit, zero-padded form used for display.
    pub fn padded(&self) -> String {
        format!("{:0>6}", self.0)
    }

    /// Whether the entry names a subtree.
    pub fn is_directory(&self) -> bool {
        self.padded().starts_with("04")
    }

    /// Object kind implied by the mode alone, when the referenced object is
    /// not available to ask. Gitlinks name commits in another repository.
    pub fn implied_kind(&self) -> ObjectKind {
        match &self.padded()[..2] {
            "04" => ObjectKind::Tree,
            "16" => ObjectKind::Commit,
            _ => ObjectKind::Blob,
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.padded())
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// File mode (regular, executable, symlink, directory, gitlink).
    pub mode: EntryMode,
    /// Entry name as raw bytes.
    pub name: Vec<u8>,
    /// Id of the referenced blob or tree.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<Vec<u8>>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }

    /// Entry name for display. Invalid UTF-8 is replaced.
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn is_subtree(&self) -> bool {
        self.mode.is_directory()
    }

    /// Check that the name can be written into a tree and read back.
    ///
    /// The name is terminated by a NUL in the serialized form, so it must not
    /// contain one, and it must not be empty.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.is_empty() {
            return Err(StoreError::malformed("tree entry has an empty name"));
        }
        if self.name.contains(&0) {
            return Err(StoreError::malformed(format!(
                "tree entry name {:?} contains a NUL byte",
                self.name_lossy()
            )));
        }
        Ok(())
    }

    /// Sort key used by canonical ordering: directories compare as if their
    /// name ended in `/`.
    fn sort_key(&self) -> Cow<'_, [u8]> {
        if self.is_subtree() {
            let mut key = self.name.clone();
            key.push(b'/');
            Cow::Owned(key)
        } else {
            Cow::Borrowed(&self.name)
        }
    }
}

/// Directory listing object.
///
/// Entries keep the order they were parsed or constructed in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a tree with entries in the given order.
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a tree payload.
    pub fn parse(raw: &[u8]) -> StoreResult<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < raw.len() {
            let rest = &raw[pos..];
            let space = rest
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| StoreError::malformed("tree entry has no mode separator"))?;
            let mode = EntryMode::parse(&rest[..space])?;

            let null = rest[space..]
                .iter()
                .position(|&b| b == 0)
                .map(|offset| space + offset)
                .ok_or_else(|| StoreError::malformed("tree entry name is not null-terminated"))?;
            let name = rest[space + 1..null].to_vec();

            let hash = rest
                .get(null + 1..null + 1 + HASH_LEN)
                .ok_or_else(|| StoreError::malformed("tree entry hash is truncated"))?;
            let object_id = ObjectId::from_slice(hash)?;

            entries.push(TreeEntry {
                mode,
                name,
                object_id,
            });
            pos += null + 1 + HASH_LEN;
        }

        Ok(Self { entries })
    }

    /// Check every entry with [`TreeEntry::validate`].
    pub fn validate(&self) -> StoreResult<()> {
        self.entries.iter().try_for_each(TreeEntry::validate)
    }

    /// Serialize entries in list order.
    ///
    /// Entries are written as-is; call [`Tree::validate`] first if they did
    /// not come from [`Tree::parse`].
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_str().as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.object_id.as_bytes());
        }
        out
    }

    /// Reorder entries the way trees are conventionally written, so that
    /// identical directory contents always hash the same.
    pub fn sort_canonical(&mut self) {
        self.entries
            .sort_by(|a, b| a.sort_key().as_ref().cmp(b.sort_key().as_ref()));
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
