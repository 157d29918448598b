//! Canonical checksum feed for a frame: a CRC-64/ISO digest over the textual
//! rendering of `(version, request_type, sequence_number, payload)`,
//! reproducing the tuple-repr convention the optical protocol was distilled
//! from (see `SPEC_FULL.md` §6.2). The CRC itself is the same algorithm
//! Python's `crc64iso` package uses, so it is bit-for-bit compatible; the one
//! piece not independently verified against the original byte for byte is
//! the `repr()`-style quoting/escaping of the payload fed into it.

use crate::crc64::crc64;

/// Renders `payload` the way Python's `repr(bytes)` would: single-quoted,
/// with `\xNN` escapes for anything outside printable ASCII.
fn python_bytes_repr(payload: &[u8]) -> String {
    let mut out = String::with_capacity(payload.len() + 3);
    out.push_str("b'");
    for &byte in payload {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{:02x}", byte)),
        }
    }
    out.push('\'');
    out
}

/// Builds the canonical `"(<v>, <t>, <s>, <p>)"` string fed to the CRC.
fn canonical_tuple(version: u8, request_type: u8, sequence_number: i32, payload: Option<&[u8]>) -> String {
    let payload_repr = match payload {
        None => "None".to_string(),
        Some(bytes) => python_bytes_repr(bytes),
    };
    format!("({}, {}, {}, {})", version, request_type, sequence_number, payload_repr)
}

/// Computes the 8-byte little-endian checksum for a frame's header fields
/// plus its payload (or `None` for a zero-length, unset payload).
pub fn calculate_checksum(version: u8, request_type: u8, sequence_number: i32, payload: Option<&[u8]>) -> [u8; 8] {
    let feed = canonical_tuple(version, request_type, sequence_number, payload);
    crc64(feed.as_bytes()).to_le_bytes()
}
