use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressSummary {
    pub filename: String,
    pub chunks: u32,
    pub original_bytes: u64,
    /// On-disk bytes of all artifacts, headers and filenames included.
    pub compressed_bytes: u64,
    /// BLAKE3 of the source file, hex.
    pub digest: String,
    pub elapsed: Duration,
    pub output_dir: PathBuf,
}

impl CompressSummary {
    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        100.0 - 100.0 * self.compressed_bytes as f64 / self.original_bytes as f64
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecompressSummary {
    pub filename: String,
    /// `None` when only verifying.
    pub output: Option<PathBuf>,
    pub chunks: u32,
    pub bytes: u64,
    /// BLAKE3 of the reconstructed bytes, hex.
    pub digest: String,
    pub elapsed: Duration,
}
