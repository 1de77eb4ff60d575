use crate::error::{DchunkError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CHUNK_SIZE: u64 = 20 * 1024 * 1024;
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;
pub const DEFAULT_IO_BUFFER_SIZE: usize = 1024 * 1024;

/// Per-run knobs for the compress and decompress pipelines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    /// Upper bound on the raw bytes carried by one chunk.
    pub max_chunk_size: u64,
    /// zstd level; a speed/ratio tradeoff, never a correctness concern.
    pub compression_level: i32,
    /// Buffer used for sequential reads of the source file.
    pub io_buffer_size: usize,
    /// Worker threads; `None` sizes the pool to hardware parallelism.
    pub threads: Option<usize>,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            io_buffer_size: DEFAULT_IO_BUFFER_SIZE,
            threads: None,
        }
    }
}

impl ChunkOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(DchunkError::Config("max_chunk_size must be at least 1".into()));
        }
        if self.io_buffer_size == 0 {
            return Err(DchunkError::Config("io_buffer_size must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(DchunkError::Config("threads must be at least 1".into()));
        }
        Ok(())
    }
}
