//! E2E Test Suite 02: Error Handling
//!
//! Every failure mode a caller can hit, end to end: destination budgets too
//! small for compression, the full catalogue of malformed streams on the
//! decompression side, and the std error-trait surface.

use lz4k::{
    compress, compress_bound, decompress, CompressState, CompressError, DecompressError,
};

// ─────────────────────────────────────────────────────────────────────────────
// Compression: destination budgets
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_budget_smaller_than_any_block_fails() {
    let mut state = CompressState::new();
    for cap in 0..3usize {
        let mut dst = vec![0u8; cap];
        assert_eq!(
            compress(&mut state, b"data", &mut dst),
            Err(CompressError::OutputTooSmall),
            "capacity {cap}"
        );
    }
}

#[test]
fn test_page_threshold_budget() {
    // zram stores a page raw unless it compresses below a threshold; model
    // a 3/4-page budget and check both sides of it.
    let mut state = CompressState::new();
    let budget = 3 * 4096 / 4;
    let mut dst = vec![0u8; budget];

    let compressible = b"swap me out swap me out ".repeat(171);
    assert!(compress(&mut state, &compressible[..4096], &mut dst).is_ok());

    let incompressible: Vec<u8> = (0u32..4096)
        .map(|i| (i.wrapping_mul(0x9E3779B1) >> 23) as u8)
        .collect();
    assert_eq!(
        compress(&mut state, &incompressible, &mut dst),
        Err(CompressError::OutputTooSmall)
    );
}

#[test]
fn test_failure_leaves_caller_free_to_store_raw() {
    // The documented recovery: on OutputTooSmall, keep the source verbatim.
    let mut state = CompressState::new();
    let src: Vec<u8> = (0u32..512).map(|i| (i.wrapping_mul(2246822519) >> 24) as u8).collect();
    let mut dst = vec![0u8; src.len()];

    let stored: Vec<u8> = match compress(&mut state, &src, &mut dst) {
        Ok(n) => dst[..n].to_vec(),
        Err(CompressError::OutputTooSmall) => src.clone(),
    };
    assert_eq!(stored, src);
}

// ─────────────────────────────────────────────────────────────────────────────
// Decompression: malformed streams
// ─────────────────────────────────────────────────────────────────────────────

fn assert_malformed(src: &[u8], cap: usize) {
    let mut dst = vec![0u8; cap];
    assert_eq!(
        decompress(src, &mut dst),
        Err(DecompressError::MalformedInput),
        "stream {src:02x?}"
    );
}

#[test]
fn test_malformed_stream_catalogue() {
    // Partial token.
    assert_malformed(&[0x10], 64);
    assert_malformed(&[0x10, 0x00], 64);
    // Literal run past the end of the stream.
    assert_malformed(&[0x00, 0x00, 0x30], 64);
    // Escape chain past the end of the stream.
    assert_malformed(&[0x00, 0x00, 0xF0], 64);
    assert_malformed(&[0x00, 0x00, 0xF0, 0xFF, 0xFF], 4096);
    // Back-reference before the start of the output.
    assert_malformed(&[0x01, 0x00, 0x00], 64);
    // Terminal token with a match-length field.
    assert_malformed(&[0x00, 0x00, 0x01, 0xAA], 64);
    // Terminal token with trailing bytes.
    assert_malformed(&[0x00, 0x00, 0x10, 0xAA, 0x00], 64);
}

#[test]
fn test_output_capacity_is_enforced() {
    // A valid stream expanding to 4096 must fail into anything smaller.
    let mut state = CompressState::new();
    let page = vec![0x5Au8; 4096];
    let mut packed = vec![0u8; compress_bound(page.len())];
    let n = compress(&mut state, &page, &mut packed).unwrap();

    for cap in [0usize, 1, 4095] {
        assert_malformed(&packed[..n], cap);
    }
    let mut exact = vec![0u8; 4096];
    assert_eq!(decompress(&packed[..n], &mut exact), Ok(4096));
}

#[test]
fn test_no_partial_success() {
    // When a stream fails halfway, the result must be the error alone; a
    // caller that checks the result never consumes partial output.
    let mut bad = vec![0x04, 0x00, 0x40];
    bad.extend_from_slice(b"abcd");
    // offset 4 is fine, but the next token is truncated garbage.
    bad.push(0x55);
    let mut dst = vec![0u8; 64];
    assert!(decompress(&bad, &mut dst).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Error types at the trait level
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_errors_are_std_errors() {
    let c: Box<dyn std::error::Error> = Box::new(CompressError::OutputTooSmall);
    assert_eq!(c.to_string(), "output buffer was insufficient");

    let d: Box<dyn std::error::Error> = Box::new(DecompressError::MalformedInput);
    assert_eq!(d.to_string(), "invalid compressed data");
}

#[test]
fn test_errors_are_comparable_and_copyable() {
    let e = CompressError::OutputTooSmall;
    let f = e;
    assert_eq!(e, f);

    let g = DecompressError::MalformedInput;
    let h = g;
    assert_eq!(g, h);
}
