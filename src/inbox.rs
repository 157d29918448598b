//! Persists a reassembled file under `received-files/` (component C4).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{QrxferError, Result};

/// Writes `data` under `dir` as `File-<timestamp><suffix>`, creating `dir`
/// if it doesn't exist yet. `suffix` should include the leading dot (e.g.
/// `.png`); `None` appends no extension.
pub fn write_file(dir: &Path, timestamp: &str, suffix: Option<&str>, data: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| QrxferError::InboxWriteFailed {
        path: dir.display().to_string(),
        source,
    })?;

    let file_name = format!("File-{}{}", timestamp, suffix.unwrap_or(""));
    let path = dir.join(file_name);
    fs::write(&path, data).map_err(|source| QrxferError::InboxWriteFailed {
        path: path.display().to_string(),
        source,
    })?;

    Ok(path)
}
