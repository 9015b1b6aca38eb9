//! Writing user-facing download files (template, results export).

use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write `contents` to `dir/filename`, replacing any existing file.
///
/// The contents go to a temp file in `dir` that is renamed into place.
pub fn save(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let dest = dir.join(filename);

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(&dest).map_err(|e| e.error)?;

    tracing::info!(path = %dest.display(), bytes = contents.len(), "saved download");
    Ok(dest)
}
