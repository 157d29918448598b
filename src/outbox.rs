//! Scans `send-files/` for the next file to transmit (component C3).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Returns the contents and path of the first file under `dir`, or `None`
/// if the directory is empty or absent. Entries are visited in sorted
/// filename order so "first" is deterministic across platforms.
pub fn next_file(dir: &Path) -> Option<(Vec<u8>, PathBuf)> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let path = entries.into_iter().next()?;
    let contents = fs::read(&path).ok()?;
    Some((contents, path))
}

/// Deletes the source file after a successful transfer. A missing file is
/// not an error here: the caller logs it and resets the session regardless
/// (`SPEC_FULL.md` §7).
pub fn remove(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}
