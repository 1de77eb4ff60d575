mod common;

use common::*;
use dchunk_core::container::record::{Chunk, HEADER_LEN};
use dchunk_core::{ChunkOptions, compress, decompress, inspect, verify};
use std::fs;

#[test]
fn roundtrip_across_sizes_and_chunk_sizes() {
    let cases: &[(usize, u64)] = &[
        (0, 1),
        (1, 1),
        (37, 1),
        (64, 7),
        (1000, 999),
        (1000, 1000),
        (1001, 1000),
        (100_000, 4096),
        (100_000, 20 * 1024 * 1024),
    ];
    for &(size, max) in cases {
        let dir = tempfile::tempdir().unwrap();
        let data = sample_bytes(size, size as u64 + max);
        let src = write_file(dir.path(), "input.bin", &data);
        let chunks = dir.path().join("chunks");
        let out = dir.path().join("restored.bin");

        let summary = compress(&src, &chunks, &opts(max)).unwrap();
        let expected_chunks = (size as u64).div_ceil(max).max(1);
        assert_eq!(u64::from(summary.chunks), expected_chunks, "size={size} max={max}");
        assert_eq!(chunk_files(&chunks).len() as u64, expected_chunks);

        let restored = decompress(&chunks, Some(&out), &opts(max)).unwrap();
        assert_eq!(fs::read(&out).unwrap(), data, "size={size} max={max}");
        assert_eq!(restored.digest, summary.digest);
        assert_eq!(restored.bytes, size as u64);
    }
}

#[test]
fn empty_file_is_one_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(dir.path(), "empty.txt", b"");
    let chunks = dir.path().join("chunks");

    let summary = compress(&src, &chunks, &ChunkOptions::default()).unwrap();
    assert_eq!(summary.chunks, 1);
    assert_eq!(summary.original_bytes, 0);
    assert!(chunks.join("chunk_1_of_1.dchunk").is_file());

    let out = dir.path().join("back.txt");
    decompress(&chunks, Some(&out), &ChunkOptions::default()).unwrap();
    assert!(fs::read(&out).unwrap().is_empty());
}

#[test]
fn forty_five_mib_in_twenty_mib_chunks() {
    const MIB: u64 = 1024 * 1024;
    let dir = tempfile::tempdir().unwrap();
    let data = sample_bytes(45 * MIB as usize, 45);
    let src = write_file(dir.path(), "big.dat", &data);
    let chunks = dir.path().join("chunks");

    let summary = compress(&src, &chunks, &opts(20 * MIB)).unwrap();
    assert_eq!(summary.chunks, 3);

    let names: Vec<String> = chunk_files(&chunks)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "chunk_1_of_3.dchunk",
            "chunk_2_of_3.dchunk",
            "chunk_3_of_3.dchunk"
        ]
    );

    let infos = inspect(&chunks).unwrap();
    let sizes: Vec<u64> = infos.iter().map(|i| i.uncompressed_size).collect();
    assert_eq!(sizes, vec![20 * MIB, 20 * MIB, 5 * MIB]);
    assert!(infos.iter().all(|i| i.total_chunks == 3));
    assert!(infos.iter().all(|i| i.original_file_size == 45 * MIB));
    assert!(infos.iter().all(|i| i.filename == "big.dat"));

    let out = dir.path().join("big.restored");
    decompress(&chunks, Some(&out), &opts(20 * MIB)).unwrap();
    assert_eq!(digest_file(&out), digest_file(&src));
}

#[test]
fn placement_ignores_artifact_names() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample_bytes(10_000, 7);
    let src = write_file(dir.path(), "doc.txt", &data);
    let chunks = dir.path().join("chunks");
    compress(&src, &chunks, &opts(1000)).unwrap();

    // Rename so that path order is the reverse of index order.
    let files = chunk_files(&chunks);
    let n = files.len();
    for (i, p) in files.iter().enumerate() {
        fs::rename(p, chunks.join(format!("{:02}.dchunk", n - i))).unwrap();
    }

    let out = dir.path().join("doc.out");
    decompress(&chunks, Some(&out), &opts(1000)).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn artifacts_carry_header_filename_and_payload() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample_bytes(3000, 3);
    let src = write_file(dir.path(), "notes.md", &data);
    let chunks = dir.path().join("chunks");
    compress(&src, &chunks, &opts(2000)).unwrap();

    let raw = fs::read(chunks.join("chunk_2_of_2.dchunk")).unwrap();
    assert_eq!(&raw[0..8], b"DCHUNKV1");
    assert_eq!(&raw[HEADER_LEN..HEADER_LEN + 8], b"notes.md");

    let chunk = Chunk::read_from(&raw[..]).unwrap();
    assert_eq!(chunk.index, 1);
    assert_eq!(chunk.uncompressed_size, 1000);
    assert_eq!(chunk.checksum, crc32fast::hash(&data[2000..]));
    assert_eq!(raw.len() as u64, chunk.encoded_len());
}

#[test]
fn single_worker_and_tiny_buffers_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample_bytes(50_000, 11);
    let src = write_file(dir.path(), "a.bin", &data);
    let chunks = dir.path().join("chunks");
    let o = ChunkOptions {
        max_chunk_size: 4096,
        compression_level: 19,
        io_buffer_size: 3,
        threads: Some(1),
    };
    compress(&src, &chunks, &o).unwrap();
    let out = dir.path().join("a.out");
    decompress(&chunks, Some(&out), &o).unwrap();
    assert_eq!(fs::read(&out).unwrap(), data);
}

#[test]
fn verify_writes_nothing_and_reports_digest() {
    let dir = tempfile::tempdir().unwrap();
    let data = sample_bytes(20_000, 5);
    let src = write_file(dir.path(), "v.bin", &data);
    let chunks = dir.path().join("chunks");
    compress(&src, &chunks, &opts(3000)).unwrap();
    let before = fs::read_dir(&chunks).unwrap().count();

    let summary = verify(&chunks, &opts(3000)).unwrap();
    assert_eq!(summary.output, None);
    assert_eq!(summary.digest, blake3::hash(&data).to_hex().to_string());
    assert_eq!(summary.chunks, 7);
    assert_eq!(fs::read_dir(&chunks).unwrap().count(), before);
}

#[test]
fn compress_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_file(dir.path(), "t.bin", &sample_bytes(5000, 9));
    let chunks = dir.path().join("chunks");
    compress(&src, &chunks, &opts(1024)).unwrap();
    let all = fs::read_dir(&chunks).unwrap().count();
    assert_eq!(all, chunk_files(&chunks).len());
}
