use crate::error::Result;

/// Byte-buffer compression used for chunk payloads.
///
/// Implementations must be deterministic for a given configuration and input,
/// and safe to share between worker threads.
pub trait Compressor: Send + Sync {
    fn name(&self) -> &'static str;
    fn compress(&self, src: &[u8]) -> Result<Vec<u8>>;
    /// `expected_len` is the declared uncompressed size; any other decoded
    /// length is a codec error.
    fn decompress(&self, src: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// CRC-32 (IEEE) over uncompressed bytes. Corruption detector only.
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

pub mod zstdc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_reference_vector() {
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn checksum_is_stable_across_threads() {
        let data: Vec<u8> = (0..100_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let here = checksum(&data);
        let there = std::thread::scope(|s| s.spawn(|| checksum(&data)).join().unwrap());
        assert_eq!(here, there);
        assert_eq!(here, checksum(&data));
    }
}
