use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of a stored object.
///
/// This is a closed set. Every tag that appears in a record header must map to
/// one of these variants through [`ObjectKind::from_tag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Opaque file content.
    Blob,
    /// Directory listing: ordered entries naming other objects.
    Tree,
    /// Snapshot with ancestry: header lines plus a message.
    Commit,
}

/// Dispatch table from header tag to kind.
const TAGS: [(&[u8], ObjectKind); 3] = [
    (b"blob", ObjectKind::Blob),
    (b"tree", ObjectKind::Tree),
    (b"commit", ObjectKind::Commit),
];

impl ObjectKind {
    /// All object kinds, in tag-table order.
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit];

    /// Look up a kind by its header tag.
    pub fn from_tag(tag: &[u8]) -> Result<Self, TypeError> {
        TAGS.iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| TypeError::UnknownKind(String::from_utf8_lossy(tag).into_owned()))
    }

    /// The tag written in record headers.
    pub fn as_tag(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    /// Record header for a payload of `len` bytes: `<tag> <len>\0`.
    pub fn header(&self, len: usize) -> Vec<u8> {
        let mut header = Vec::with_capacity(self.as_tag().len() + 22);
        header.extend_from_slice(self.as_tag());
        header.push(b' ');
        header.extend_from_slice(len.to_string().as_bytes());
        header.push(0);
        header
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.as_bytes())
    }
}
