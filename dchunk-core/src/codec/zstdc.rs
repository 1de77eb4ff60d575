use super::Compressor;
use crate::error::{DchunkError, Result};
use std::io::{Read, Write};

pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Compressor for ZstdCompressor {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, src: &[u8]) -> Result<Vec<u8>> {
        let range = zstd::compression_level_range();
        if !range.contains(&self.level) {
            return Err(DchunkError::codec(format!(
                "zstd level {} outside {}..={}",
                self.level,
                range.start(),
                range.end()
            )));
        }
        let mut enc = zstd::stream::Encoder::new(Vec::with_capacity(src.len() / 2), self.level)
            .map_err(|e| DchunkError::codec(format!("zstd init: {e}")))?;
        enc.write_all(src)
            .map_err(|e| DchunkError::codec(format!("zstd compress: {e}")))?;
        // `finish` writes the frame epilogue
        enc.finish()
            .map_err(|e| DchunkError::codec(format!("zstd finish: {e}")))
    }

    fn decompress(&self, src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        let dec = zstd::stream::read::Decoder::with_buffer(src)
            .map_err(|e| DchunkError::codec(format!("zstd init: {e}")))?;
        // The declared size comes from an untrusted header; only a hint.
        let mut out = Vec::with_capacity(expected_len.min(src.len().saturating_mul(64)));
        // Read one byte past the declared size so oversized frames are caught.
        dec.take((expected_len as u64).saturating_add(1))
            .read_to_end(&mut out)
            .map_err(|e| DchunkError::codec(format!("zstd decompress: {e}")))?;
        if out.len() != expected_len {
            return Err(DchunkError::codec(format!(
                "decoded {} bytes, header declares {expected_len}",
                out.len()
            )));
        }
        Ok(out)
    }
}
