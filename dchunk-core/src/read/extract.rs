use crate::codec::zstdc::ZstdCompressor;
use crate::codec::{Compressor, checksum};
use crate::config::ChunkOptions;
use crate::container::record::Chunk;
use crate::container::set::{ChunkSet, ChunkSetBuilder};
use crate::discover::list_candidates;
use crate::error::{DchunkError, Result};
use crate::pool::WorkerPool;
use crate::progress::Progress;
use crate::stats::DecompressSummary;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Rebuild the original file from the chunk artifacts in `chunks_dir`.
///
/// The output goes to `output` when given, else to the embedded filename in
/// the current directory. No output file exists unless every chunk verified.
pub fn decompress(
    chunks_dir: &Path,
    output: Option<&Path>,
    opts: &ChunkOptions,
) -> Result<DecompressSummary> {
    let zstd = ZstdCompressor::new(opts.compression_level);
    decompress_with(chunks_dir, output, opts, &zstd)
}

pub fn decompress_with(
    chunks_dir: &Path,
    output: Option<&Path>,
    opts: &ChunkOptions,
    codec: &dyn Compressor,
) -> Result<DecompressSummary> {
    let started = Instant::now();
    opts.validate()?;

    let set = load_chunk_set(chunks_dir, opts.io_buffer_size)?;
    let dest = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(safe_file_name(&set.filename)?),
    };
    info!(
        "decompressing {} chunk(s) of {:?} ({} compressed bytes) -> {}",
        set.total_chunks,
        set.filename,
        set.compressed_bytes(),
        dest.display()
    );

    let parts = decode_all(&set, opts, codec)?;

    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".dchunk-")
        .suffix(".part")
        .tempfile_in(parent)?;
    let mut hasher = blake3::Hasher::new();
    {
        let mut w = BufWriter::with_capacity(opts.io_buffer_size, tmp.as_file_mut());
        for part in &parts {
            hasher.update(part);
            w.write_all(part)?;
        }
        w.flush()?;
    }
    tmp.persist(&dest).map_err(|e| DchunkError::Io(e.error))?;

    let elapsed = started.elapsed();
    info!(
        "reconstructed {} bytes in {} ms -> {}",
        set.original_file_size,
        elapsed.as_millis(),
        dest.display()
    );
    Ok(DecompressSummary {
        filename: set.filename,
        output: Some(dest),
        chunks: set.total_chunks,
        bytes: set.original_file_size,
        digest: hasher.finalize().to_hex().to_string(),
        elapsed,
    })
}

/// Full discovery, validation, decompression and checksum pass with no output.
pub fn verify(chunks_dir: &Path, opts: &ChunkOptions) -> Result<DecompressSummary> {
    let zstd = ZstdCompressor::new(opts.compression_level);
    verify_with(chunks_dir, opts, &zstd)
}

pub fn verify_with(
    chunks_dir: &Path,
    opts: &ChunkOptions,
    codec: &dyn Compressor,
) -> Result<DecompressSummary> {
    let started = Instant::now();
    opts.validate()?;

    let set = load_chunk_set(chunks_dir, opts.io_buffer_size)?;
    let parts = decode_all(&set, opts, codec)?;
    let mut hasher = blake3::Hasher::new();
    for part in &parts {
        hasher.update(part);
    }

    let summary = DecompressSummary {
        filename: set.filename,
        output: None,
        chunks: set.total_chunks,
        bytes: set.original_file_size,
        digest: hasher.finalize().to_hex().to_string(),
        elapsed: started.elapsed(),
    };
    info!(
        "verified {} chunk(s), {} bytes of {:?}",
        summary.chunks, summary.bytes, summary.filename
    );
    Ok(summary)
}

/// Parse every candidate in `chunks_dir` and assemble a complete set.
pub fn load_chunk_set(chunks_dir: &Path, io_buffer_size: usize) -> Result<ChunkSet> {
    let candidates = list_candidates(chunks_dir)?;
    let mut builder = ChunkSetBuilder::new();
    for path in &candidates {
        let chunk = read_artifact(path, io_buffer_size)?;
        debug!(
            "{}: chunk {} of {}, {} -> {} bytes",
            path.display(),
            chunk.index,
            chunk.total_chunks,
            chunk.compressed_size(),
            chunk.uncompressed_size
        );
        builder.add(path, chunk)?;
    }
    builder.finish()
}

fn read_artifact(path: &Path, io_buffer_size: usize) -> Result<Chunk> {
    let f = File::open(path)?;
    Chunk::read_from(BufReader::with_capacity(io_buffer_size, f)).map_err(|e| match e {
        DchunkError::Format(m) => DchunkError::Format(format!("{}: {m}", path.display())),
        other => other,
    })
}

/// Decompress and checksum every chunk in parallel; parts come back in index order.
fn decode_all(set: &ChunkSet, opts: &ChunkOptions, codec: &dyn Compressor) -> Result<Vec<Vec<u8>>> {
    let progress = Progress::new("verified", set.total_chunks);
    let mut pool = WorkerPool::new(opts.threads);
    for chunk in set.chunks() {
        let progress = &progress;
        pool.submit(move || {
            let raw = decode_chunk(chunk, codec)?;
            progress.chunk_done(chunk.index, chunk.compressed_size(), raw.len() as u64);
            Ok(raw)
        });
    }
    let parts = pool.run_to_completion()?;
    let done = progress.snapshot();
    debug!(
        "{}/{} chunk(s) verified: {} -> {} bytes",
        done.done, done.total, done.bytes_in, done.bytes_out
    );
    Ok(parts)
}

fn decode_chunk(chunk: &Chunk, codec: &dyn Compressor) -> Result<Vec<u8>> {
    let expected = usize::try_from(chunk.uncompressed_size).map_err(|_| {
        DchunkError::Format(format!(
            "chunk {} declares {} bytes, more than this host can address",
            chunk.index, chunk.uncompressed_size
        ))
    })?;
    let raw = codec
        .decompress(&chunk.payload, expected)
        .map_err(|e| e.in_chunk(chunk.index))?;
    let actual = checksum(&raw);
    if actual != chunk.checksum {
        return Err(DchunkError::Integrity {
            index: chunk.index,
            expected: chunk.checksum,
            actual,
        });
    }
    Ok(raw)
}

/// Reduce an embedded filename to one safe path component.
fn safe_file_name(name: &str) -> Result<&str> {
    let p = Path::new(name);
    let mut comps = p.components();
    match (comps.next(), comps.next()) {
        (Some(std::path::Component::Normal(c)), None)
            if !name.contains(['/', '\\']) && c.to_str() == Some(name) =>
        {
            Ok(name)
        }
        _ => Err(DchunkError::Format(format!("unsafe filename in chunk header: {name:?}"))),
    }
}
