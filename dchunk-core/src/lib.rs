#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub mod codec;

pub mod container {
    pub mod record;
    pub mod set;
}

pub mod discover;
pub mod plan;
pub mod pool;
pub mod progress;
pub mod stats;

pub mod pack {
    pub mod writer;
}

pub mod read {
    pub mod extract;
}

pub mod list;

// Re-exports: stable API surface
pub use codec::Compressor;
pub use codec::zstdc::ZstdCompressor;
pub use config::ChunkOptions;
pub use error::{DchunkError, Result};
pub use list::{ChunkInfo, inspect};
pub use pack::writer::{compress, compress_with};
pub use read::extract::{decompress, decompress_with, verify, verify_with};
pub use stats::{CompressSummary, DecompressSummary};
