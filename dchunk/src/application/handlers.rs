use std::path::PathBuf;

use dchunk_core::error::Result;
use dchunk_core::{ChunkOptions, compress, decompress, inspect, verify};

fn options_with_threads(threads: Option<usize>) -> ChunkOptions {
    ChunkOptions {
        threads,
        ..Default::default()
    }
}

pub fn handle_compress(
    input_file: PathBuf,
    output_directory: PathBuf,
    chunk_size: u64,
    level: i32,
    buffer_size: usize,
    threads: Option<usize>,
) -> Result<()> {
    let opts = ChunkOptions {
        max_chunk_size: chunk_size,
        compression_level: level,
        io_buffer_size: buffer_size,
        threads,
    };
    let s = compress(&input_file, &output_directory, &opts)?;
    println!(
        "{}: {} bytes -> {} chunk(s), {} bytes ({:.2}% reduction) in {}",
        s.filename,
        s.original_bytes,
        s.chunks,
        s.compressed_bytes,
        s.reduction_percent(),
        s.output_dir.display()
    );
    Ok(())
}

pub fn handle_decompress(
    chunks_directory: PathBuf,
    output_file: Option<PathBuf>,
    threads: Option<usize>,
) -> Result<()> {
    let opts = options_with_threads(threads);
    let s = decompress(&chunks_directory, output_file.as_deref(), &opts)?;
    let out = s.output.as_deref().map(|p| p.display().to_string());
    println!(
        "{}: {} bytes from {} chunk(s) -> {} (blake3 {})",
        s.filename,
        s.bytes,
        s.chunks,
        out.unwrap_or_default(),
        s.digest
    );
    Ok(())
}

pub fn handle_verify(chunks_directory: PathBuf, threads: Option<usize>) -> Result<()> {
    let opts = options_with_threads(threads);
    let s = verify(&chunks_directory, &opts)?;
    println!(
        "verify: OK ({}: {} bytes, {} chunk(s), blake3 {})",
        s.filename, s.bytes, s.chunks, s.digest
    );
    Ok(())
}

pub fn handle_inspect(chunks_directory: PathBuf, json: bool) -> Result<()> {
    let rows = inspect(&chunks_directory)?;
    if json {
        let text = serde_json::to_string_pretty(&rows).map_err(std::io::Error::from)?;
        println!("{text}");
        return Ok(());
    }
    for r in rows {
        println!(
            "#{:<5} of {:<5} u={:<10} c={:<10} crc={:08x} file={} ({} bytes)  {}",
            u64::from(r.index) + 1,
            r.total_chunks,
            r.uncompressed_size,
            r.compressed_size,
            r.checksum,
            r.filename,
            r.original_file_size,
            r.path.display()
        );
    }
    Ok(())
}
