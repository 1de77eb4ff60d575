use clap::{Parser, Subcommand};
use dchunk_core::config::{
    DEFAULT_COMPRESSION_LEVEL, DEFAULT_IO_BUFFER_SIZE, DEFAULT_MAX_CHUNK_SIZE,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Split large files into self-describing compressed chunks, and put them back together",
    long_about = None
)]
pub struct Cli {
    /// Log per-chunk progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a file into chunk artifacts
    #[command(visible_alias = "c")]
    Compress {
        input_file: PathBuf,
        output_directory: PathBuf,

        /// Maximum uncompressed bytes per chunk
        #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_SIZE)]
        chunk_size: u64,

        /// zstd compression level
        #[arg(long, default_value_t = DEFAULT_COMPRESSION_LEVEL, allow_negative_numbers = true)]
        level: i32,

        /// Read buffer size in bytes
        #[arg(long, default_value_t = DEFAULT_IO_BUFFER_SIZE)]
        buffer_size: usize,

        /// Worker threads (defaults to available parallelism)
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Rebuild the original file from a directory of chunk artifacts
    #[command(visible_alias = "d")]
    Decompress {
        chunks_directory: PathBuf,

        /// Defaults to the original filename in the current directory
        output_file: Option<PathBuf>,

        #[arg(long)]
        threads: Option<usize>,
    },

    /// Check that a chunk directory is complete and uncorrupted, writing nothing
    Verify {
        chunks_directory: PathBuf,

        #[arg(long)]
        threads: Option<usize>,
    },

    /// List chunk headers without decompressing
    Inspect {
        chunks_directory: PathBuf,

        /// Emit JSON instead of one line per chunk
        #[arg(long)]
        json: bool,
    },
}
