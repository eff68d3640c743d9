//! LZ4K block compression and decompression.
//!
//! This module contains the whole block-format engine: the token format and
//! scratch table ([`types`]), the greedy encoder ([`compress()`]), and the
//! bounds-safe decoder ([`decompress()`]). A block is self-contained: there
//! is no framing, no checksum, and no state carried between blocks.

pub mod compress;
pub mod decompress;
pub mod types;

// Re-export the most important public API items at the module level.
pub use compress::{compress, compress_bound, CompressError};
pub use decompress::{decompress, DecompressError};
pub use types::{CompressState, HASH_SLOTS, MAX_INPUT_SIZE, MIN_MATCH, TOKEN_BYTES};

#[cfg(feature = "alloc")]
extern crate alloc;

/// Compress `src` into a freshly allocated `Vec` sized with
/// [`compress_bound`], then shrink it to the compressed length.
///
/// Returns an empty `Vec` when the input cannot be encoded (longer than the
/// 64 KB window); with a bound-sized buffer there is no other failure.
#[cfg(feature = "alloc")]
pub fn compress_to_vec(state: &mut CompressState, src: &[u8]) -> alloc::vec::Vec<u8> {
    let mut out = alloc::vec![0u8; compress_bound(src.len())];
    match compress(state, src, &mut out) {
        Ok(n) => {
            out.truncate(n);
            out
        }
        Err(_) => alloc::vec::Vec::new(),
    }
}

/// Decompress `src` into a `Vec` of capacity `max_decompressed`, shrunk to
/// the decoded length. Returns an empty `Vec` on malformed input.
#[cfg(feature = "alloc")]
pub fn decompress_to_vec(src: &[u8], max_decompressed: usize) -> alloc::vec::Vec<u8> {
    let mut out = alloc::vec![0u8; max_decompressed];
    match decompress(src, &mut out) {
        Ok(n) => {
            out.truncate(n);
            out
        }
        Err(_) => alloc::vec::Vec::new(),
    }
}
