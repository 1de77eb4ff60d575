use crate::codec::zstdc::ZstdCompressor;
use crate::codec::{Compressor, checksum};
use crate::config::ChunkOptions;
use crate::container::record::{Chunk, artifact_name};
use crate::discover::list_candidates;
use crate::error::{DchunkError, Result};
use crate::plan::{ChunkPlan, plan_chunks};
use crate::pool::WorkerPool;
use crate::progress::Progress;
use crate::stats::CompressSummary;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Split `input` into chunk artifacts under `output_dir` using zstd at
/// `opts.compression_level`.
pub fn compress(input: &Path, output_dir: &Path, opts: &ChunkOptions) -> Result<CompressSummary> {
    let zstd = ZstdCompressor::new(opts.compression_level);
    compress_with(input, output_dir, opts, &zstd)
}

/// As [`compress`], with a caller-supplied codec.
///
/// Nothing is written to `output_dir` unless every chunk compressed.
pub fn compress_with(
    input: &Path,
    output_dir: &Path,
    opts: &ChunkOptions,
    codec: &dyn Compressor,
) -> Result<CompressSummary> {
    let started = Instant::now();
    opts.validate()?;

    let not_found = |source: io::Error| DchunkError::InputNotFound {
        path: input.to_path_buf(),
        source,
    };
    let meta = fs::metadata(input).map_err(not_found)?;
    if !meta.is_file() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    let mut src = File::open(input).map_err(not_found)?;
    let filename = input
        .file_name()
        .ok_or_else(|| not_found(io::Error::new(io::ErrorKind::InvalidInput, "no file name")))?
        .to_str()
        .map(str::to_owned)
        .ok_or_else(|| {
            not_found(io::Error::new(
                io::ErrorKind::InvalidInput,
                "file name is not valid UTF-8",
            ))
        })?;

    let file_size = meta.len();
    let plan = plan_chunks(file_size, opts.max_chunk_size)?;
    let total_chunks = plan.total_chunks()?;
    info!(
        "{filename}: {file_size} bytes -> {total_chunks} chunk(s) of at most {} bytes, {} level {}",
        opts.max_chunk_size,
        codec.name(),
        opts.compression_level
    );

    let (buffers, digest) = read_ranges(&mut src, &plan, opts.io_buffer_size)?;
    drop(src);

    let progress = Progress::new("compressed", total_chunks);
    let mut pool = WorkerPool::new(opts.threads);
    debug!("compressing on {} worker thread(s)", pool.threads());
    for (index, raw) in (0u32..).zip(buffers) {
        let progress = &progress;
        let filename = &filename;
        pool.submit(move || {
            let payload = codec.compress(&raw).map_err(|e| e.in_chunk(index))?;
            if payload.len() > raw.len() {
                warn!(
                    "chunk {index} grew under compression: {} -> {} bytes",
                    raw.len(),
                    payload.len()
                );
            }
            progress.chunk_done(index, raw.len() as u64, payload.len() as u64);
            Ok(Chunk {
                index,
                total_chunks,
                original_file_size: file_size,
                uncompressed_size: raw.len() as u64,
                filename: filename.clone(),
                checksum: checksum(&raw),
                payload,
            })
        });
    }
    let chunks = pool.run_to_completion()?;
    let done = progress.snapshot();
    debug!(
        "{}/{} chunk(s) compressed: {} -> {} payload bytes",
        done.done, done.total, done.bytes_in, done.bytes_out
    );

    let compressed_bytes = emit(&chunks, output_dir, opts.io_buffer_size)?;

    let summary = CompressSummary {
        filename,
        chunks: total_chunks,
        original_bytes: file_size,
        compressed_bytes,
        digest,
        elapsed: started.elapsed(),
        output_dir: output_dir.to_path_buf(),
    };
    info!(
        "compressed {} bytes into {} bytes across {} chunk(s) ({:.2}% reduction) in {} ms -> {}",
        summary.original_bytes,
        summary.compressed_bytes,
        summary.chunks,
        summary.reduction_percent(),
        summary.elapsed.as_millis(),
        output_dir.display()
    );
    Ok(summary)
}

/// Sequentially read every planned range into its own buffer, in
/// `io_buffer_size` steps. Also returns the BLAKE3 of the whole file.
fn read_ranges(
    src: &mut impl Read,
    plan: &ChunkPlan,
    io_buffer_size: usize,
) -> Result<(Vec<Vec<u8>>, String)> {
    let mut hasher = blake3::Hasher::new();
    let mut buffers = Vec::with_capacity(plan.len());
    for r in &plan.ranges {
        let len = usize::try_from(r.end - r.start)
            .map_err(|_| DchunkError::Config("chunk does not fit in memory".into()))?;
        let mut buf = vec![0u8; len];
        for window in buf.chunks_mut(io_buffer_size) {
            src.read_exact(window).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    io::Error::new(e.kind(), "source file shrank while reading")
                } else {
                    e
                }
            })?;
        }
        hasher.update(&buf);
        buffers.push(buf);
    }
    Ok((buffers, hasher.finalize().to_hex().to_string()))
}

/// Write every chunk to a temp file in `output_dir`, then rename them all into
/// place. Returns the total bytes written.
fn emit(chunks: &[Chunk], output_dir: &Path, io_buffer_size: usize) -> Result<u64> {
    fs::create_dir_all(output_dir)?;
    warn_on_stale_artifacts(chunks, output_dir);

    let mut staged = Vec::with_capacity(chunks.len());
    let mut written = 0u64;
    for chunk in chunks {
        let mut tmp = tempfile::Builder::new()
            .prefix(".dchunk-")
            .suffix(".part")
            .tempfile_in(output_dir)?;
        {
            let mut w = BufWriter::with_capacity(io_buffer_size, tmp.as_file_mut());
            chunk.write_to(&mut w)?;
            w.flush()?;
        }
        written += chunk.encoded_len();
        staged.push((tmp, output_dir.join(artifact_name(chunk.index, chunk.total_chunks))));
    }

    for (tmp, dest) in staged {
        tmp.persist(&dest).map_err(|e| DchunkError::Io(e.error))?;
        debug!("wrote {}", dest.display());
    }
    Ok(written)
}

fn warn_on_stale_artifacts(chunks: &[Chunk], output_dir: &Path) {
    let ours: Vec<PathBuf> = chunks
        .iter()
        .map(|c| output_dir.join(artifact_name(c.index, c.total_chunks)))
        .collect();
    let Ok(existing) = list_candidates(output_dir) else {
        return;
    };
    let stale = existing.iter().filter(|p| !ours.contains(p)).count();
    if stale > 0 {
        warn!(
            "{} contains {stale} chunk artifact(s) from another run; decompressing it will fail until they are removed",
            output_dir.display()
        );
    }
}
