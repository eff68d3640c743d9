//! C-ABI shims - export the two symbols a kernel-style harness links.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! The produced staticlib can stand in for the reference object file in a
//! block-codec benchmark link. Result conventions follow the kernel module:
//! byte counts on success, -1 on failure.

use core::ffi::{c_int, c_uint, c_void};
use core::slice;

use crate::block::compress::compress;
use crate::block::decompress::decompress;
use crate::block::types::CompressState;

// ─────────────────────────────────────────────────────────────────────────────
// lz4k_compress
//
// int lz4k_compress(void *state, const void *source, void *dest,
//                   unsigned source_max, unsigned dest_max);
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `source_max` bytes from `source` into `dest`.
///
/// Returns the compressed size, or -1 when no encoding fits `dest_max`.
///
/// # Safety
/// - `state` must point to writable memory of at least
///   [`crate::size_of_state()`] bytes, aligned for `u16`. Its contents on
///   entry are irrelevant; it is scratch only.
/// - `source` must be readable for `source_max` bytes and `dest` writable
///   for `dest_max` bytes, with no overlap between the two.
#[no_mangle]
pub unsafe extern "C" fn lz4k_compress(
    state: *mut c_void,
    source: *const c_void,
    dest: *mut c_void,
    source_max: c_uint,
    dest_max: c_uint,
) -> c_int {
    if state.is_null() || source.is_null() || dest.is_null() {
        return -1;
    }
    let state = &mut *(state as *mut CompressState);
    let src = slice::from_raw_parts(source as *const u8, source_max as usize);
    let dst = slice::from_raw_parts_mut(dest as *mut u8, dest_max as usize);
    match compress(state, src, dst) {
        Ok(n) => n as c_int,
        Err(_) => -1,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// lz4k_decompress
//
// int lz4k_decompress(const void *source, void *dest,
//                     unsigned source_max, unsigned dest_max);
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress the `source_max`-byte block at `source` into `dest`.
///
/// `source_max` must be the exact compressed size. Returns the decompressed
/// size, or -1 on any malformed input.
///
/// # Safety
/// `source` must be readable for `source_max` bytes and `dest` writable for
/// `dest_max` bytes, with no overlap between the two.
#[no_mangle]
pub unsafe extern "C" fn lz4k_decompress(
    source: *const c_void,
    dest: *mut c_void,
    source_max: c_uint,
    dest_max: c_uint,
) -> c_int {
    if source.is_null() || dest.is_null() {
        return -1;
    }
    let src = slice::from_raw_parts(source as *const u8, source_max as usize);
    let dst = slice::from_raw_parts_mut(dest as *mut u8, dest_max as usize);
    match decompress(src, dst) {
        Ok(n) => n as c_int,
        Err(_) => -1,
    }
}
