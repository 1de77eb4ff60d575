//! On-disk chunk artifact: fixed 48-byte header, filename, compressed payload.
//!
//! All integers are little-endian regardless of host.
//!
//! | off | len | field               |
//! |-----|-----|---------------------|
//! | 0   | 8   | magic `DCHUNKV1`    |
//! | 8   | 4   | index               |
//! | 12  | 4   | total_chunks        |
//! | 16  | 8   | original_file_size  |
//! | 24  | 8   | uncompressed_size   |
//! | 32  | 8   | compressed_size     |
//! | 40  | 4   | filename_length     |
//! | 44  | 4   | checksum (CRC-32)   |

use crate::error::{DchunkError, Result};
use std::io::{self, Read, Write};

pub const MAGIC: [u8; 8] = *b"DCHUNKV1";
pub const HEADER_LEN: usize = 48;
pub const EXTENSION: &str = "dchunk";

/// Deterministic artifact name; display index is 1-based.
pub fn artifact_name(index: u32, total_chunks: u32) -> String {
    format!("chunk_{}_of_{}.{EXTENSION}", u64::from(index) + 1, total_chunks)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub index: u32,
    pub total_chunks: u32,
    pub original_file_size: u64,
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub filename_length: u32,
    pub checksum: u32,
}

impl ChunkHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..8].copy_from_slice(&MAGIC);
        buf[8..12].copy_from_slice(&self.index.to_le_bytes());
        buf[12..16].copy_from_slice(&self.total_chunks.to_le_bytes());
        buf[16..24].copy_from_slice(&self.original_file_size.to_le_bytes());
        buf[24..32].copy_from_slice(&self.uncompressed_size.to_le_bytes());
        buf[32..40].copy_from_slice(&self.compressed_size.to_le_bytes());
        buf[40..44].copy_from_slice(&self.filename_length.to_le_bytes());
        buf[44..48].copy_from_slice(&self.checksum.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; HEADER_LEN]) -> Result<Self> {
        if buf[0..8] != MAGIC {
            return Err(DchunkError::Format("bad chunk magic".into()));
        }
        Ok(Self {
            index: le32(&buf[8..12]),
            total_chunks: le32(&buf[12..16]),
            original_file_size: le64(&buf[16..24]),
            uncompressed_size: le64(&buf[24..32]),
            compressed_size: le64(&buf[32..40]),
            filename_length: le32(&buf[40..44]),
            checksum: le32(&buf[44..48]),
        })
    }

    pub fn read_from(mut r: impl Read) -> Result<Self> {
        let mut buf = [0u8; HEADER_LEN];
        r.read_exact(&mut buf).map_err(truncated("header"))?;
        Self::from_bytes(&buf)
    }
}

#[inline]
fn le32(x: &[u8]) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(x);
    u32::from_le_bytes(b)
}

#[inline]
fn le64(x: &[u8]) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(x);
    u64::from_le_bytes(b)
}

fn truncated(section: &'static str) -> impl Fn(io::Error) -> DchunkError {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DchunkError::Format(format!("truncated chunk {section}"))
        } else {
            DchunkError::Io(e)
        }
    }
}

/// One self-describing chunk. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: u32,
    pub total_chunks: u32,
    pub original_file_size: u64,
    pub uncompressed_size: u64,
    pub filename: String,
    pub checksum: u32,
    pub payload: Vec<u8>,
}

impl Chunk {
    pub fn compressed_size(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn header(&self) -> Result<ChunkHeader> {
        let filename_length = u32::try_from(self.filename.len())
            .map_err(|_| DchunkError::Format("filename longer than u32::MAX bytes".into()))?;
        Ok(ChunkHeader {
            index: self.index,
            total_chunks: self.total_chunks,
            original_file_size: self.original_file_size,
            uncompressed_size: self.uncompressed_size,
            compressed_size: self.compressed_size(),
            filename_length,
            checksum: self.checksum,
        })
    }

    /// Size of the serialized artifact.
    pub fn encoded_len(&self) -> u64 {
        (HEADER_LEN + self.filename.len()) as u64 + self.compressed_size()
    }

    /// Header, then filename bytes, then payload.
    pub fn write_to(&self, mut w: impl Write) -> Result<()> {
        w.write_all(&self.header()?.to_bytes())?;
        w.write_all(self.filename.as_bytes())?;
        w.write_all(&self.payload)?;
        Ok(())
    }

    /// Parse one artifact using only header-declared lengths.
    pub fn read_from(mut r: impl Read) -> Result<Self> {
        let header = ChunkHeader::read_from(&mut r)?;
        let filename = read_filename(&mut r, header.filename_length)?;

        let payload_len = usize::try_from(header.compressed_size)
            .map_err(|_| DchunkError::Format("compressed_size exceeds address space".into()))?;
        let mut payload = Vec::new();
        r.by_ref()
            .take(header.compressed_size)
            .read_to_end(&mut payload)?;
        if payload.len() != payload_len {
            return Err(DchunkError::Format(format!(
                "truncated chunk payload: {} of {payload_len} bytes",
                payload.len()
            )));
        }

        Ok(Self {
            index: header.index,
            total_chunks: header.total_chunks,
            original_file_size: header.original_file_size,
            uncompressed_size: header.uncompressed_size,
            filename,
            checksum: header.checksum,
            payload,
        })
    }
}

/// Read the filename section that follows a header.
pub fn read_filename(mut r: impl Read, len: u32) -> Result<String> {
    let mut name = Vec::new();
    r.by_ref().take(u64::from(len)).read_to_end(&mut name)?;
    if name.len() != len as usize {
        return Err(DchunkError::Format("truncated chunk filename".into()));
    }
    String::from_utf8(name).map_err(|_| DchunkError::Format("filename is not UTF-8".into()))
}
