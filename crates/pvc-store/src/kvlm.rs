//! Key-value list with message: the text format of commit payloads.
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Thibault Polge <thibault@thb.lt> 1527025023 +0200
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL
//!  -----END PGP SIGNATURE-----
//!
//! Create first draft
//! ```
//!
//! A value continues across lines that begin with a single space. Keys may
//! repeat; the values of a key are kept in encounter order, grouped under
//! the key's first occurrence.

use crate::error::{StoreError, StoreResult};

/// Parsed header lines plus the trailing message.
///
/// Headers are an ordered list of `key -> values`. A key that appears once has
/// a one-element list; a repeated key (multiple `parent` lines) keeps all of
/// its values in order. The list of values is never empty.
///
/// Keys are ordered by first occurrence, so interleaved repeats do not
/// survive a round trip: `parent a`, `author x`, `parent b` re-serializes as
/// `parent a`, `parent b`, `author x`, and the commit hashes differently.
/// Records whose repeated keys are adjacent, as every commit written by this
/// crate is, round-trip byte for byte.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Kvlm {
    headers: Vec<(Vec<u8>, Vec<Vec<u8>>)>,
    message: Vec<u8>,
}

impl Kvlm {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a commit payload.
    pub fn parse(raw: &[u8]) -> StoreResult<Self> {
        let mut kvlm = Self::new();
        let mut pos = 0;

        loop {
            let space = find(raw, b' ', pos);
            let newline = find(raw, b'\n', pos);

            // A newline before any space ends the header block.
            match (space, newline) {
                (_, Some(nl)) if space.map_or(true, |sp| nl < sp) => {
                    if nl != pos {
                        return Err(StoreError::malformed(format!(
                            "commit header line without a value at byte {pos}"
                        )));
                    }
                    kvlm.message = raw[nl + 1..].to_vec();
                    return Ok(kvlm);
                }
                (None, None) => {
                    return Err(StoreError::malformed(
                        "commit has no blank line before its message",
                    ));
                }
                _ => {}
            }

            // `space` is set here: the (None, _) cases returned above.
            let space = space.unwrap_or_default();
            let key = raw[pos..space].to_vec();

            let mut end = space;
            loop {
                end = find(raw, b'\n', end + 1).ok_or_else(|| {
                    StoreError::malformed("commit header value is not newline-terminated")
                })?;
                if raw.get(end + 1) != Some(&b' ') {
                    break;
                }
            }

            let value = unescape(&raw[space + 1..end]);
            kvlm.push(key, value);
            pos = end + 1;
        }
    }

    /// Serialize back to the exact text form.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, values) in &self.headers {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                out.extend_from_slice(&escape(value));
                out.push(b'\n');
            }
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Append a value for `key`, keeping the key's original position.
    pub fn push(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.headers.push((key, vec![value])),
        }
    }

    /// Replace all values for `key`. An empty `values` removes the key.
    pub fn set(&mut self, key: impl Into<Vec<u8>>, values: Vec<Vec<u8>>) {
        let key = key.into();
        if values.is_empty() {
            self.headers.retain(|(k, _)| *k != key);
            return;
        }
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.headers.push((key, values)),
        }
    }

    /// All values for `key`, in encounter order.
    pub fn get(&self, key: &[u8]) -> Option<&[Vec<u8>]> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// The first value for `key`.
    pub fn get_first(&self, key: &[u8]) -> Option<&[u8]> {
        self.get(key).and_then(|v| v.first()).map(Vec::as_slice)
    }

    /// Header keys in original order.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.headers.iter().map(|(k, _)| k.as_slice())
    }

    /// The free-text message following the blank line.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<Vec<u8>>) {
        self.message = message.into();
    }
}

fn find(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|offset| from + offset)
}

/// Strip the single continuation space after each embedded newline.
fn unescape(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    let mut i = 0;
    while i < value.len() {
        out.push(value[i]);
        if value[i] == b'\n' && value.get(i + 1) == Some(&b' ') {
            i += 1;
        }
        i += 1;
    }
    out
}

/// Re-insert a continuation space after every embedded newline.
fn escape(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for &b in value {
        out.push(b);
        if b == b'\n' {
            out.push(b' ');
        }
    }
    out
}
