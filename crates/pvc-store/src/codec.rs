//! Record framing and compression.
//!
//! On disk every object is a zlib stream wrapping a framed record:
//!
//! ```text
//! <type> 0x20 <ascii-decimal payload length> 0x00 <payload>
//! ```
//!
//! The object id is the SHA-1 of the framed record before compression.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pvc_types::ObjectKind;

use crate::error::{StoreError, StoreResult};

/// Default zlib level, matching the usual loose-object setting.
pub const DEFAULT_COMPRESSION: u32 = 6;

/// Frame a payload: `<tag> <len>\0<payload>`.
pub fn encode(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let mut record = kind.header(payload.len());
    record.extend_from_slice(payload);
    record
}

/// Parse a framed record into its kind and payload.
///
/// The declared length must equal the number of bytes following the null
/// terminator exactly.
pub fn decode(record: &[u8]) -> StoreResult<(ObjectKind, &[u8])> {
    let space = record
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| StoreError::malformed("record header has no type separator"))?;
    let null = record[space..]
        .iter()
        .position(|&b| b == 0)
        .map(|offset| space + offset)
        .ok_or_else(|| StoreError::malformed("record header has no null terminator"))?;

    let kind = ObjectKind::from_tag(&record[..space])?;
    let declared = parse_length(&record[space + 1..null])?;
    let payload = &record[null + 1..];

    if declared != payload.len() {
        return Err(StoreError::malformed(format!(
            "bad length: header declares {declared} bytes, record carries {}",
            payload.len()
        )));
    }
    Ok((kind, payload))
}

fn parse_length(digits: &[u8]) -> StoreResult<usize> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(StoreError::malformed(format!(
            "record length is not a decimal number: {:?}",
            String::from_utf8_lossy(digits)
        )));
    }
    // All-ASCII digits, so the UTF-8 conversion cannot fail.
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| StoreError::malformed("record length overflows"))
}

/// zlib-compress a framed record at the given level (0-9).
pub fn compress(record: &[u8], level: u32) -> StoreResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(record)?;
    Ok(encoder.finish()?)
}

/// Inflate a stored object back into its framed record.
pub fn decompress(bytes: &[u8]) -> StoreResult<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut record = Vec::new();
    decoder
        .read_to_end(&mut record)
        .map_err(|e| StoreError::malformed(format!("zlib stream is corrupt: {e}")))?;
    Ok(record)
}
