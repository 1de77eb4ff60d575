use crate::container::record::{ChunkHeader, read_filename};
use crate::discover::list_candidates;
use crate::error::{DchunkError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Header-level view of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkInfo {
    pub path: PathBuf,
    pub index: u32,
    pub total_chunks: u32,
    pub original_file_size: u64,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub checksum: u32,
    pub filename: String,
}

/// Read the header and filename of every artifact in `chunks_dir`, sorted by
/// index then path. Payloads are not read and the set is not validated.
pub fn inspect(chunks_dir: &Path) -> Result<Vec<ChunkInfo>> {
    let mut out = Vec::new();
    for path in list_candidates(chunks_dir)? {
        let (h, filename) = read_head(&path).map_err(|e| match e {
            DchunkError::Format(m) => DchunkError::Format(format!("{}: {m}", path.display())),
            other => other,
        })?;
        out.push(ChunkInfo {
            path,
            index: h.index,
            total_chunks: h.total_chunks,
            original_file_size: h.original_file_size,
            uncompressed_size: h.uncompressed_size,
            compressed_size: h.compressed_size,
            checksum: h.checksum,
            filename,
        });
    }
    out.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.path.cmp(&b.path)));
    Ok(out)
}

fn read_head(path: &Path) -> Result<(ChunkHeader, String)> {
    let mut r = BufReader::new(File::open(path)?);
    let h = ChunkHeader::read_from(&mut r)?;
    let filename = read_filename(&mut r, h.filename_length)?;
    Ok((h, filename))
}
