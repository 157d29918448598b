//! Splits a file into fixed-size indexed chunks and reassembles them
//! (component C2). The sender's side is a dense, contiguous `Vec` (per
//! `SPEC_FULL.md` §9 "Chunk map as a dense array"); the receiver's side
//! uses a `BTreeMap` since chunks may arrive with gaps before `finish`.

use std::collections::BTreeMap;

pub const CHUNK_SIZE: usize = 200;

/// Splits `data` into `CHUNK_SIZE`-byte chunks, indices `0..ceil(len/size)`.
/// An empty blob yields an empty vector of chunks.
pub fn split(data: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
    if data.is_empty() {
        return Vec::new();
    }
    data.chunks(chunk_size).map(|c| c.to_vec()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContiguityError {
    pub min_missing: i32,
}

/// Concatenates `chunks` in ascending index order. Fails if the key set is
/// not exactly `{0, ..=max}` (or the map is non-empty but doesn't start at
/// 0).
pub fn reassemble(chunks: &BTreeMap<i32, Vec<u8>>) -> Result<Vec<u8>, ContiguityError> {
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(missing) = first_missing_index(chunks) {
        return Err(ContiguityError { min_missing: missing });
    }

    let mut out = Vec::new();
    for bytes in chunks.values() {
        out.extend_from_slice(bytes);
    }
    Ok(out)
}

/// Returns the smallest index in `0..=max(keys)` absent from `chunks`, or
/// `None` if the map is contiguous from 0.
pub fn first_missing_index(chunks: &BTreeMap<i32, Vec<u8>>) -> Option<i32> {
    let max = *chunks.keys().next_back()?;
    (0..=max).find(|i| !chunks.contains_key(i))
}

/// Builds the dense chunk vector produced by `split` into the map shape the
/// receiver's state uses; used by tests and by the sender when it needs
/// map-style lookups (e.g. a `repeat_data` for an arbitrary index).
pub fn to_map(chunks: &[Vec<u8>]) -> BTreeMap<i32, Vec<u8>> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, bytes)| (i as i32, bytes.clone()))
        .collect()
}
