use crate::container::record::EXTENSION;
use crate::error::{DchunkError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Chunk artifacts directly inside `dir` (no recursion), sorted by path.
///
/// Only the extension is consulted; names are never parsed for indices.
pub fn list_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DchunkError::InputNotFound {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }
    let mut found = Vec::new();
    for e in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let e = e.map_err(std::io::Error::other)?;
        if !e.file_type().is_file() {
            continue;
        }
        let p = e.path();
        if p.extension().is_some_and(|x| x == EXTENSION) {
            found.push(p.to_path_buf());
        }
    }
    found.sort();
    debug!("found {} chunk artifacts in {}", found.len(), dir.display());
    Ok(found)
}
