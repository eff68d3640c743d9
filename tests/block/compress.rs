// Unit tests for block compression:
//   - compress_bound worst-case sizes
//   - literal-only fallbacks (empty, tiny, incompressible input)
//   - match emission for repetitive input, including escape chains
//   - capacity failures at every stage
//   - determinism and scratch-state reuse

use lz4k::block::compress::{compress, compress_bound, CompressError};
use lz4k::block::types::{CompressState, MAX_INPUT_SIZE};
use lz4k::decompress;

/// Allocate a worst-case destination buffer for `src_len` bytes.
fn bound_buf(src_len: usize) -> Vec<u8> {
    vec![0u8; compress_bound(src_len)]
}

// ─────────────────────────────────────────────────────────────────────────────
// compress_bound
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bound_small_inputs_cost_one_token() {
    assert_eq!(compress_bound(0), 3);
    assert_eq!(compress_bound(1), 4);
    assert_eq!(compress_bound(14), 17);
}

#[test]
fn bound_grows_by_one_escape_byte_at_the_field_mask() {
    // 15 literals saturate the field and need one (zero-valued) escape byte.
    assert_eq!(compress_bound(15), 19);
    assert_eq!(compress_bound(16), 20);
    // 15 + 254 still fits a single escape byte; one more needs two.
    assert_eq!(compress_bound(269), 273);
    assert_eq!(compress_bound(270), 275);
}

#[test]
fn bound_for_a_page_and_the_full_window() {
    assert_eq!(compress_bound(4096), 4116);
    assert_eq!(compress_bound(65_536), 65_796);
}

// ─────────────────────────────────────────────────────────────────────────────
// Literal-only encodings
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_is_a_bare_terminal_token() {
    let mut state = CompressState::new();
    let mut dst = [0xEEu8; 8];
    let n = compress(&mut state, &[], &mut dst).unwrap();
    assert_eq!(n, 3);
    assert_eq!(&dst[..3], &[0, 0, 0]);
}

#[test]
fn single_byte_is_token_plus_literal() {
    let mut state = CompressState::new();
    let mut dst = [0u8; 4];
    let n = compress(&mut state, &[0x42], &mut dst).unwrap();
    assert_eq!(n, 4);
    // Literal field 1, offset 0, match field 0.
    assert_eq!(dst, [0x00, 0x00, 0x10, 0x42]);
}

#[test]
fn tiny_inputs_always_go_out_as_literals() {
    let mut state = CompressState::new();
    for len in 1..=16usize {
        let src: Vec<u8> = (0..len as u8).collect();
        let mut dst = bound_buf(len);
        let n = compress(&mut state, &src, &mut dst).unwrap();
        assert_eq!(n, compress_bound(len), "len {len}");
        // The tail copy is verbatim.
        assert_eq!(&dst[n - len..n], &src[..]);
    }
}

#[test]
fn incompressible_input_is_exactly_the_literal_fallback() {
    // 256 strictly ascending bytes: every 4-byte window is unique, so no
    // match can exist and the output is the full literal tail.
    let src: Vec<u8> = (0..=255u8).collect();
    let mut state = CompressState::new();
    let mut dst = bound_buf(src.len());
    let n = compress(&mut state, &src, &mut dst).unwrap();
    assert_eq!(n, compress_bound(src.len()));
    // Terminal token with a saturated literal field, then the escape byte.
    assert_eq!(&dst[..4], &[0x00, 0x00, 0xF0, 241]);
    assert_eq!(&dst[4..4 + 256], &src[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Match emission
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn constant_page_compresses_to_one_match_token() {
    let src = [0xAAu8; 4096];
    let mut state = CompressState::new();
    let mut dst = [0u8; 4096];
    let n = compress(&mut state, &src, &mut dst).unwrap();
    assert_eq!(n, 20);
    // One literal, then a 4095-byte match at offset 1: token, the literal,
    // fifteen full escape bytes and the 251 terminator.
    let mut expected = vec![0x01, 0x00, 0x1F, 0xAA];
    expected.extend_from_slice(&[0xFF; 15]);
    expected.push(251);
    assert_eq!(&dst[..n], &expected[..]);
}

#[test]
fn repeated_text_round_trips_and_shrinks() {
    let src = b"The quick brown fox jumps over the lazy dog. ".repeat(40);
    let mut state = CompressState::new();
    let mut dst = bound_buf(src.len());
    let n = compress(&mut state, &src, &mut dst).unwrap();
    assert!(n < src.len(), "compressed {n} >= original {}", src.len());

    let mut out = vec![0u8; src.len()];
    let m = decompress(&dst[..n], &mut out).unwrap();
    assert_eq!(m, src.len());
    assert_eq!(out, src);
}

#[test]
fn long_literal_run_before_a_match_uses_an_escape_chain() {
    // 300 unique-window bytes, then a repeat of the first 64.
    let mut src: Vec<u8> = Vec::new();
    for i in 0..300u32 {
        src.push((i % 251) as u8);
        // Stretch the period so 4-byte windows stay unique.
        src.push((i / 251) as u8);
    }
    src.extend_from_slice(&src[..64].to_vec());

    let mut state = CompressState::new();
    let mut dst = bound_buf(src.len());
    let n = compress(&mut state, &src, &mut dst).unwrap();

    let mut out = vec![0u8; src.len()];
    let m = decompress(&dst[..n], &mut out).unwrap();
    assert_eq!(m, src.len());
    assert_eq!(out, src);
}

// ─────────────────────────────────────────────────────────────────────────────
// Capacity failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_still_needs_three_bytes() {
    let mut state = CompressState::new();
    let mut dst = [0u8; 2];
    assert_eq!(
        compress(&mut state, &[], &mut dst),
        Err(CompressError::OutputTooSmall)
    );
}

#[test]
fn zero_capacity_always_fails() {
    let mut state = CompressState::new();
    let mut dst = [0u8; 0];
    assert_eq!(
        compress(&mut state, b"x", &mut dst),
        Err(CompressError::OutputTooSmall)
    );
}

#[test]
fn incompressible_input_does_not_fit_its_own_size() {
    let src: Vec<u8> = (0..=255u8).collect();
    let mut state = CompressState::new();
    let mut dst = vec![0u8; src.len()];
    assert_eq!(
        compress(&mut state, &src, &mut dst),
        Err(CompressError::OutputTooSmall)
    );
}

#[test]
fn over_window_input_is_rejected() {
    let src = vec![0u8; MAX_INPUT_SIZE + 1];
    let mut state = CompressState::new();
    let mut dst = vec![0u8; compress_bound(src.len())];
    assert_eq!(
        compress(&mut state, &src, &mut dst),
        Err(CompressError::OutputTooSmall)
    );
}

#[test]
fn bound_sized_destination_never_fails() {
    let mut state = CompressState::new();
    let patterns: [&[u8]; 4] = [
        b"",
        b"abcabcabcabcabcabcabcabc",
        &[0x55; 1000],
        b"no repeats here: 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ!",
    ];
    for src in patterns {
        let mut dst = bound_buf(src.len());
        compress(&mut state, src, &mut dst).unwrap();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Determinism and state reuse
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn identical_calls_produce_identical_bytes() {
    let src = b"deterministic deterministic deterministic".repeat(8);
    let mut state = CompressState::new();
    let mut a = bound_buf(src.len());
    let mut b = bound_buf(src.len());
    let na = compress(&mut state, &src, &mut a).unwrap();
    let nb = compress(&mut state, &src, &mut b).unwrap();
    assert_eq!(na, nb);
    assert_eq!(a[..na], b[..nb]);
}

#[test]
fn dirty_state_is_re_zeroed_on_entry() {
    let src = b"state reuse state reuse state reuse!".repeat(4);

    let mut fresh = CompressState::new();
    let mut a = bound_buf(src.len());
    let na = compress(&mut fresh, &src, &mut a).unwrap();

    let mut dirty = CompressState::new();
    for h in 0..lz4k::block::types::HASH_SLOTS {
        dirty.insert(h, 0x7777);
    }
    let mut b = bound_buf(src.len());
    let nb = compress(&mut dirty, &src, &mut b).unwrap();

    assert_eq!(na, nb);
    assert_eq!(a[..na], b[..nb]);
}

#[test]
fn error_display_is_stable() {
    let msg = format!("{}", CompressError::OutputTooSmall);
    assert_eq!(msg, "output buffer was insufficient");
}
