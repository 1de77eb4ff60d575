#![allow(dead_code)]

use dchunk_core::{ChunkOptions, Compressor, DchunkError, ZstdCompressor};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic bytes: mostly repeated text with xorshift noise mixed in.
pub fn sample_bytes(len: usize, seed: u64) -> Vec<u8> {
    const TEXT: &[u8] = b"the quick brown fox jumps over the lazy dog; ";
    let mut x = seed | 1;
    (0..len)
        .map(|i| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            if x % 5 == 0 { x as u8 } else { TEXT[i % TEXT.len()] }
        })
        .collect()
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, data).unwrap();
    p
}

pub fn opts(max_chunk_size: u64) -> ChunkOptions {
    ChunkOptions {
        max_chunk_size,
        ..Default::default()
    }
}

pub fn digest_file(p: &Path) -> String {
    blake3::hash(&fs::read(p).unwrap()).to_hex().to_string()
}

pub fn chunk_files(dir: &Path) -> Vec<PathBuf> {
    let mut v: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|x| x == "dchunk"))
        .collect();
    v.sort();
    v
}

/// Always fails to compress.
pub struct BrokenCodec;

impl Compressor for BrokenCodec {
    fn name(&self) -> &'static str {
        "broken"
    }
    fn compress(&self, _src: &[u8]) -> dchunk_core::Result<Vec<u8>> {
        Err(DchunkError::codec("injected failure"))
    }
    fn decompress(&self, _src: &[u8], _expected_len: usize) -> dchunk_core::Result<Vec<u8>> {
        Err(DchunkError::codec("injected failure"))
    }
}

/// zstd that counts decompress calls.
pub struct CountingCodec {
    inner: ZstdCompressor,
    pub decompressed: AtomicUsize,
}

impl CountingCodec {
    pub fn new() -> Self {
        Self {
            inner: ZstdCompressor::new(3),
            decompressed: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.decompressed.load(Ordering::SeqCst)
    }
}

impl Compressor for CountingCodec {
    fn name(&self) -> &'static str {
        "counting-zstd"
    }
    fn compress(&self, src: &[u8]) -> dchunk_core::Result<Vec<u8>> {
        self.inner.compress(src)
    }
    fn decompress(&self, src: &[u8], expected_len: usize) -> dchunk_core::Result<Vec<u8>> {
        self.decompressed.fetch_add(1, Ordering::SeqCst);
        self.inner.decompress(src, expected_len)
    }
}
