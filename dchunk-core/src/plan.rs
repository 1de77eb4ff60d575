use crate::error::{DchunkError, Result};
use std::ops::Range;

/// Contiguous, non-overlapping `[start, end)` ranges covering a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub file_size: u64,
    pub max_chunk_size: u64,
    pub ranges: Vec<Range<u64>>,
}

impl ChunkPlan {
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Chunk count as stored in the record header.
    pub fn total_chunks(&self) -> Result<u32> {
        u32::try_from(self.ranges.len()).map_err(|_| too_many_chunks(self.ranges.len() as u64))
    }
}

fn too_many_chunks(count: u64) -> DchunkError {
    DchunkError::Config(format!(
        "{count} chunks exceed the u32 index space; raise max_chunk_size"
    ))
}

/// Split `file_size` bytes into `max(1, ceil(file_size / max_chunk_size))` ranges.
///
/// An empty file still gets one (empty) range so it round-trips through a chunk.
pub fn plan_chunks(file_size: u64, max_chunk_size: u64) -> Result<ChunkPlan> {
    if max_chunk_size == 0 {
        return Err(DchunkError::Config("max_chunk_size must be at least 1".into()));
    }
    let count = file_size.div_ceil(max_chunk_size).max(1);
    if count > u64::from(u32::MAX) {
        return Err(too_many_chunks(count));
    }
    let count = usize::try_from(count)
        .map_err(|_| DchunkError::Config(format!("{count} chunks do not fit in memory")))?;

    let mut ranges = Vec::with_capacity(count);
    let mut start = 0u64;
    for _ in 0..count {
        let end = start.saturating_add(max_chunk_size).min(file_size);
        ranges.push(start..end);
        start = end;
    }
    Ok(ChunkPlan {
        file_size,
        max_chunk_size,
        ranges,
    })
}
