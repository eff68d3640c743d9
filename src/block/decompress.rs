//! LZ4K block decompression.
//!
//! # Security boundary
//!
//! This module is the security-critical decoding path. The compressed input
//! is untrusted: every length, offset, and escape chain is validated against
//! the real bounds of the two caller slices before any copy happens, and a
//! stream that fails any check returns
//! [`DecompressError::MalformedInput`] with nothing partially trusted.
//! There is no `unsafe` here; burst copies gain their speed from fixed-width
//! slice copies whose margins are checked explicitly, never from spare
//! bytes assumed beyond a buffer.
//!
//! Tokens are read as explicit 3-byte values, so the decoder demands no
//! readable slack after the compressed data.

use super::types::{
    read_token, token_literal_field, token_match_field, token_offset, LITERAL_MASK,
    LITERAL_STRIDE, MATCH_MASK, MATCH_STRIDE, MATCH_STRIDE_SAFE_2X, MIN_MATCH, TOKEN_BYTES,
};

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by block decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// The compressed stream is malformed, truncated, or inconsistent with
    /// the destination capacity. Nothing about the output is valid.
    MalformedInput,
}

impl core::fmt::Display for DecompressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecompressError::MalformedInput => write!(f, "invalid compressed data"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecompressError {}

#[inline(always)]
fn malformed<T>() -> Result<T, DecompressError> {
    Err(DecompressError::MalformedInput)
}

// ─────────────────────────────────────────────────────────────────────────────
// Escape-chain decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulate a 255-escape chain on top of `base`, advancing `at`.
///
/// Each byte adds up to 255; a byte below 255 ends the chain. Running off
/// the end of `src` mid-chain is malformed. On 32-bit targets the
/// accumulator is rejected before it can wrap.
#[inline]
fn read_length(src: &[u8], at: &mut usize, base: usize) -> Result<usize, DecompressError> {
    let mut length = base;
    loop {
        if *at >= src.len() {
            return malformed();
        }
        let s = src[*at] as usize;
        *at += 1;
        length += s;
        if core::mem::size_of::<usize>() < 8 && length > usize::MAX / 2 {
            return malformed();
        }
        if s != 255 {
            return Ok(length);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Copy primitives
// ─────────────────────────────────────────────────────────────────────────────

/// Copy a literal run from the compressed stream into the output.
///
/// When both buffers keep a full stride of margin past the run, the copy
/// proceeds in 32-byte bursts that may overshoot the logical length (the
/// margin absorbs it). Otherwise the run is copied exactly; if even the
/// exact length does not fit, the stream is malformed.
#[inline]
fn copy_literals(
    src: &[u8],
    sp: usize,
    dst: &mut [u8],
    dp: usize,
    len: usize,
) -> Result<(), DecompressError> {
    let s_end = sp + len;
    let d_end = dp + len;
    if s_end > src.len() || d_end > dst.len() {
        return malformed();
    }
    if s_end + LITERAL_STRIDE <= src.len() && d_end + LITERAL_STRIDE <= dst.len() {
        let mut s = sp;
        let mut d = dp;
        while d < d_end {
            dst[d..d + LITERAL_STRIDE].copy_from_slice(&src[s..s + LITERAL_STRIDE]);
            s += LITERAL_STRIDE;
            d += LITERAL_STRIDE;
        }
    } else {
        dst[dp..d_end].copy_from_slice(&src[sp..s_end]);
    }
    Ok(())
}

/// Expand a back-reference: copy `len` bytes to `at` from `offset` bytes
/// behind it, inside the output buffer itself. Source and destination may
/// overlap; each strategy below only ever reads bytes it has already
/// written.
///
/// Tier ladder, fastest first:
///   - `offset >= 16`, wide margin: two 16-byte chunks per round, the
///     second chunk reading what the first just wrote.
///   - `offset >= 8`, wide margin: 8-byte chunks (disjoint at this offset).
///   - `offset == 1`: a run of one byte, filled directly.
///   - `1 < offset < 8`, wide margin: replicate the short period at
///     doubling widths until a full chunk of pattern exists, then chunk.
///   - Anything else: byte-at-a-time against the exact destination end.
#[inline]
fn replicate(
    dst: &mut [u8],
    at: usize,
    offset: usize,
    len: usize,
) -> Result<(), DecompressError> {
    debug_assert!(offset >= 1 && offset <= at);
    let end = at + len;
    // The burst tiers overshoot `end` by up to a double chunk; their guard
    // is written subtraction-side so a hostile length cannot wrap it.
    let burst_end = dst.len().saturating_sub(MATCH_STRIDE_SAFE_2X);
    if offset >= MATCH_STRIDE && end <= burst_end {
        let mut d = at;
        while d < end {
            dst.copy_within(d - offset..d - offset + MATCH_STRIDE, d);
            dst.copy_within(
                d - offset + MATCH_STRIDE..d - offset + 2 * MATCH_STRIDE,
                d + MATCH_STRIDE,
            );
            d += 2 * MATCH_STRIDE;
        }
    } else if offset >= 8 && end <= burst_end {
        let mut d = at;
        while d < end {
            dst.copy_within(d - offset..d - offset + 8, d);
            d += 8;
        }
    } else if offset == 1 {
        if end > dst.len() {
            return malformed();
        }
        let b = dst[at - 1];
        dst[at..end].fill(b);
    } else if offset > 1 && end <= burst_end {
        // Short period: double the replicated span until a whole chunk of
        // pattern is in place, then copy chunks at that span, which stays a
        // multiple of the period.
        let mut d = at;
        let mut span = offset;
        while span < MATCH_STRIDE {
            dst.copy_within(d - span..d, d);
            d += span;
            span <<= 1;
        }
        while d < end {
            dst.copy_within(d - span..d - span + MATCH_STRIDE, d);
            d += MATCH_STRIDE;
        }
    } else {
        if end > dst.len() {
            return malformed();
        }
        let mut d = at;
        while d < end {
            dst[d] = dst[d - offset];
            d += 1;
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder
// ─────────────────────────────────────────────────────────────────────────────

/// Decompress `src` into `dst` and return the number of bytes written.
///
/// `src.len()` must be the exact compressed length, not a capacity. The
/// stream ends either with a terminal token (offset 0, carrying the final
/// literal tail) or exactly at a token boundary; anything else, and any
/// length or offset that would cross a buffer edge, fails.
pub fn decompress(src: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    let lit_mask = LITERAL_MASK as usize;
    let match_mask = MATCH_MASK as usize;
    let mut sp = 0usize;
    let mut dp = 0usize;

    while sp + TOKEN_BYTES <= src.len() {
        let token = read_token(src, sp);
        sp += TOKEN_BYTES;
        let offset = token_offset(token) as usize;
        let mut lit_len = token_literal_field(token) as usize;
        let mut match_len = token_match_field(token) as usize + MIN_MATCH;

        if lit_len == lit_mask {
            lit_len = read_length(src, &mut sp, lit_len)?;
        }
        if lit_len > 0 {
            copy_literals(src, sp, dst, dp, lit_len)?;
            sp += lit_len;
            dp += lit_len;
        }

        if match_len == match_mask + MIN_MATCH {
            match_len = read_length(src, &mut sp, match_len)?;
        }

        if offset == 0 {
            // Terminal token: nothing but the literal tail and the implicit
            // minimum match length, landing exactly on the end of the
            // stream. An empty tail is only the empty block.
            if match_len != MIN_MATCH || sp != src.len() {
                return malformed();
            }
            if lit_len == 0 && dp != 0 {
                return malformed();
            }
            return Ok(dp);
        }
        if offset > dp {
            return malformed();
        }
        replicate(dst, dp, offset, match_len)?;
        dp += match_len;
    }

    // No terminal token: valid only when the stream stops exactly on a
    // token boundary.
    if sp == src.len() {
        Ok(dp)
    } else {
        malformed()
    }
}
