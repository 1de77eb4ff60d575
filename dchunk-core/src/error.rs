use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DchunkError {
    #[error("input not found: {}: {source}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("checksum mismatch in chunk {index}: stored {expected:#010x}, computed {actual:#010x}")]
    Integrity { index: u32, expected: u32, actual: u32 },

    #[error(
        "Codec error{}: {message}",
        .index.map(|i| format!(" in chunk {i}")).unwrap_or_default()
    )]
    Codec { index: Option<u32>, message: String },

    /// `missing` lists the lowest absent indices, capped; `missing_count` is exact.
    #[error(
        "incomplete chunk set: {missing_count} of {total} chunks missing (first missing index {})",
        .missing.first().copied().unwrap_or_default()
    )]
    IncompleteChunkSet {
        total: u32,
        missing_count: u32,
        missing: Vec<u32>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("worker pool error: {0}")]
    Pool(String),
}

impl DchunkError {
    pub fn codec(message: impl Into<String>) -> Self {
        DchunkError::Codec {
            index: None,
            message: message.into(),
        }
    }

    /// Attach a chunk index to codec errors raised below the pipeline layer.
    pub fn in_chunk(self, index: u32) -> Self {
        match self {
            DchunkError::Codec {
                index: None,
                message,
            } => DchunkError::Codec {
                index: Some(index),
                message,
            },
            other => other,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, DchunkError>;
