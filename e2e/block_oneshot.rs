//! E2E Test Suite 01: Block One-Shot API
//!
//! Exercises the public surface the way a paging caller would:
//! - compress / decompress over caller-owned buffers
//! - compress_bound destination sizing
//! - scratch-state reuse across many pages
//! - Vec convenience wrappers

use lz4k::{
    compress, compress_bound, compress_to_vec, decompress, decompress_to_vec, size_of_state,
    CompressState, MAX_INPUT_SIZE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: typical-data round trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_typical_data() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(20);

    let mut state = CompressState::new();
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let n = compress(&mut state, &original, &mut compressed).expect("compression should succeed");

    assert!(
        n < original.len(),
        "compressed size {n} should be less than original {}",
        original.len()
    );

    let mut decompressed = vec![0u8; original.len()];
    let m = decompress(&compressed[..n], &mut decompressed).expect("decompression should succeed");

    assert_eq!(m, original.len());
    assert_eq!(&decompressed[..m], &original[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: incompressible-data round trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_incompressible_data() {
    // A multiplicative scramble leaves no 4-byte window repeated nearby.
    let original: Vec<u8> = (0u32..2048)
        .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
        .collect();

    let mut state = CompressState::new();
    let mut compressed = vec![0u8; compress_bound(original.len())];
    let n = compress(&mut state, &original, &mut compressed).expect("bound-sized dest never fails");

    let mut decompressed = vec![0u8; original.len()];
    let m = decompress(&compressed[..n], &mut decompressed).expect("decompression should succeed");
    assert_eq!(&decompressed[..m], &original[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: zram-style page loop with one reused scratch state
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_page_loop_reuses_scratch_state() {
    let mut state = CompressState::new_boxed();
    let mut compressed = vec![0u8; compress_bound(4096)];
    let mut restored = vec![0u8; 4096];

    for page_no in 0..32u8 {
        // Pages of varying compressibility: text head, page_no fill tail.
        let mut page = b"page contents page contents ".repeat(40);
        page.resize(4096, page_no);

        let n = compress(&mut state, &page, &mut compressed).expect("page should compress");
        let m = decompress(&compressed[..n], &mut restored).expect("page should decompress");
        assert_eq!(m, 4096);
        assert_eq!(&restored[..], &page[..]);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: empty and all-zero pages
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_input() {
    let mut state = CompressState::new();
    let mut compressed = [0u8; 8];
    let n = compress(&mut state, &[], &mut compressed).unwrap();
    assert_eq!(n, 3);

    let mut out = [0u8; 8];
    assert_eq!(decompress(&compressed[..n], &mut out), Ok(0));
}

#[test]
fn test_zero_page_compresses_tiny() {
    let page = [0u8; 4096];
    let mut state = CompressState::new();
    let mut compressed = [0u8; 64];
    let n = compress(&mut state, &page, &mut compressed).unwrap();
    assert!(n <= 24, "zero page took {n} bytes");

    let mut out = [0u8; 4096];
    assert_eq!(decompress(&compressed[..n], &mut out), Ok(4096));
    assert!(out.iter().all(|&b| b == 0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Vec convenience wrappers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_vec_wrappers_roundtrip() {
    let original = b"vectors of convenience ".repeat(30);
    let mut state = CompressState::new();

    let packed = compress_to_vec(&mut state, &original);
    assert!(!packed.is_empty());
    assert!(packed.len() <= compress_bound(original.len()));

    let restored = decompress_to_vec(&packed, original.len());
    assert_eq!(restored, original);
}

#[test]
fn test_vec_wrappers_signal_failure_with_empty_output() {
    let mut state = CompressState::new();
    let oversized = vec![0u8; MAX_INPUT_SIZE + 1];
    assert!(compress_to_vec(&mut state, &oversized).is_empty());

    assert!(decompress_to_vec(&[0x05, 0x00, 0x00], 64).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: scratch-state size is stable
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_state_size_matches_table() {
    // 4096 u16 slots.
    assert_eq!(size_of_state(), 8192);
}
