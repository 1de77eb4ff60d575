//! Validation and placement of parsed chunks into a complete set.

use crate::container::record::Chunk;
use crate::error::{DchunkError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const MAX_REPORTED_MISSING: usize = 32;

/// A complete, consistent set of chunks for one file, ordered by index.
#[derive(Debug)]
pub struct ChunkSet {
    pub filename: String,
    pub total_chunks: u32,
    pub original_file_size: u64,
    chunks: Vec<Chunk>,
}

impl ChunkSet {
    /// Chunks in index order; `chunks()[i].index == i`.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn compressed_bytes(&self) -> u64 {
        self.chunks.iter().map(Chunk::compressed_size).sum()
    }
}

/// Run-wide identity fixed by the first accepted chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SetIdentity {
    total_chunks: u32,
    original_file_size: u64,
    filename: String,
}

/// Accepts chunks in any order and rejects the set on the first inconsistency.
#[derive(Debug, Default)]
pub struct ChunkSetBuilder {
    identity: Option<SetIdentity>,
    slots: BTreeMap<u32, (PathBuf, Chunk)>,
}

impl ChunkSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn add(&mut self, path: &Path, chunk: Chunk) -> Result<()> {
        if self.identity.is_none() && chunk.total_chunks == 0 {
            return Err(DchunkError::Format(format!(
                "{}: header declares zero total_chunks",
                path.display()
            )));
        }
        let identity = self.identity.get_or_insert_with(|| SetIdentity {
            total_chunks: chunk.total_chunks,
            original_file_size: chunk.original_file_size,
            filename: chunk.filename.clone(),
        });

        if chunk.total_chunks != identity.total_chunks
            || chunk.original_file_size != identity.original_file_size
            || chunk.filename != identity.filename
        {
            return Err(DchunkError::Format(format!(
                "inconsistent chunk set: {} belongs to {:?} ({} bytes, {} chunks), expected {:?} ({} bytes, {} chunks)",
                path.display(),
                chunk.filename,
                chunk.original_file_size,
                chunk.total_chunks,
                identity.filename,
                identity.original_file_size,
                identity.total_chunks
            )));
        }
        if chunk.index >= identity.total_chunks {
            return Err(DchunkError::Format(format!(
                "{}: chunk index {} outside 0..{}",
                path.display(),
                chunk.index,
                identity.total_chunks
            )));
        }
        if let Some((prev, _)) = self.slots.get(&chunk.index) {
            return Err(DchunkError::Format(format!(
                "duplicate chunk index {}: {} and {}",
                chunk.index,
                prev.display(),
                path.display()
            )));
        }

        self.slots.insert(chunk.index, (path.to_path_buf(), chunk));
        Ok(())
    }

    /// Check for gaps and size agreement; never yields a partial set.
    pub fn finish(self) -> Result<ChunkSet> {
        let Some(identity) = self.identity else {
            return Err(DchunkError::Format("no chunk files found".into()));
        };

        let present = self.slots.len() as u32;
        if present < identity.total_chunks {
            let missing: Vec<u32> = (0..identity.total_chunks)
                .filter(|i| !self.slots.contains_key(i))
                .take(MAX_REPORTED_MISSING)
                .collect();
            return Err(DchunkError::IncompleteChunkSet {
                total: identity.total_chunks,
                missing_count: identity.total_chunks - present,
                missing,
            });
        }

        let chunks: Vec<Chunk> = self.slots.into_values().map(|(_, c)| c).collect();
        let sum = chunks
            .iter()
            .try_fold(0u64, |acc, c| acc.checked_add(c.uncompressed_size));
        if sum != Some(identity.original_file_size) {
            return Err(DchunkError::Format(format!(
                "inconsistent chunk set: chunk sizes do not add up to {} bytes",
                identity.original_file_size
            )));
        }

        Ok(ChunkSet {
            filename: identity.filename,
            total_chunks: identity.total_chunks,
            original_file_size: identity.original_file_size,
            chunks,
        })
    }
}
