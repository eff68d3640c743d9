//! LZ4K block compression for 4 KB swap pages.
//!
//! LZ4K is the LZ77-family block format used by kernel zram/swap paths to
//! squeeze fixed small pages: each compressed block is a sequence of 24-bit
//! tokens packing a 16-bit backward offset, a 4-bit match-length field, and
//! a 4-bit literal-length field, with saturated fields extended by 255-escape
//! bytes and an offset-0 token terminating the block. Offsets are 16 bits,
//! so a block covers at most 64 KB; real callers bound it to one page.
//!
//! Both directions are single-call, allocation-free transformations over
//! caller-owned buffers. [`compress`] needs a caller-supplied
//! [`CompressState`] scratch table and fails (rather than overflowing) when
//! the destination budget is too small, so a paging caller can fall back to
//! storing the page raw. [`decompress`] treats its input as hostile: it
//! never reads or writes outside the two slices it is given, whatever the
//! bytes say.
//!
//! ```
//! let mut state = lz4k::CompressState::new();
//! let page = [0xAAu8; 4096];
//! let mut packed = [0u8; 4096];
//! let n = lz4k::compress(&mut state, &page, &mut packed).unwrap();
//! let mut restored = [0u8; 4096];
//! let m = lz4k::decompress(&packed[..n], &mut restored).unwrap();
//! assert_eq!(&restored[..m], &page[..]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod block;

#[cfg(feature = "c-abi")]
pub mod abi;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::compress::{compress, compress_bound, CompressError};
pub use block::decompress::{decompress, DecompressError};
pub use block::types::{CompressState, MAX_INPUT_SIZE};

#[cfg(feature = "alloc")]
pub use block::{compress_to_vec, decompress_to_vec};

/// Size in bytes of the compression scratch state, for callers that
/// allocate it as raw memory.
pub fn size_of_state() -> usize {
    core::mem::size_of::<CompressState>()
}
