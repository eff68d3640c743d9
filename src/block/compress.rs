//! LZ4K block compression.
//!
//! A greedy single-pass encoder: a direct-mapped hash table proposes one
//! candidate per position, candidates that share a 4-byte prefix are
//! extended word-wise, and each (literal run, match) pair is emitted as a
//! 24-bit token plus 255-escape length bytes. Positions that refuse to
//! match are skipped with an accelerating step so incompressible input
//! costs bounded time instead of ratio-chasing quadratic work.
//!
//! Capacity is checked against the exact encoded size of every sequence
//! before anything is written, so the encoder never produces a partial
//! stream: either the whole block fits or the call fails with
//! [`CompressError::OutputTooSmall`] and the caller stores the page
//! uncompressed. Sizing the destination with [`compress_bound`] makes
//! failure impossible.

use super::types::{
    equal4, hash_at, matching_end, token_new, write_token, CompressState, COPY_STRIDE,
    LITERAL_MASK, MATCH_MASK, MAX_INPUT_SIZE, MIN_MATCH, SKIP_TRIGGER, TOKEN_BYTES,
};

// ─────────────────────────────────────────────────────────────────────────────
// Error type
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by block compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressError {
    /// No encoding of this input fits the destination buffer (or the input
    /// exceeds the 64 KB format window, in which case no destination would
    /// do). Recovery is the caller's: store the input uncompressed.
    OutputTooSmall,
}

impl core::fmt::Display for CompressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CompressError::OutputTooSmall => write!(f, "output buffer was insufficient"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CompressError {}

// ─────────────────────────────────────────────────────────────────────────────
// Size accounting
// ─────────────────────────────────────────────────────────────────────────────

/// Wire size of one 255-escape chain carrying `extra`: `extra / 255` full
/// bytes plus the terminating byte.
#[inline(always)]
fn escape_bytes(extra: usize) -> usize {
    extra / 255 + 1
}

/// Worst-case compressed size for `src_len` input bytes: the literal-only
/// fallback of one terminal token, its escape chain, and the bytes
/// themselves. `compress` is guaranteed to succeed whenever the destination
/// holds at least this much.
#[inline]
pub fn compress_bound(src_len: usize) -> usize {
    if src_len < LITERAL_MASK as usize {
        TOKEN_BYTES + src_len
    } else {
        TOKEN_BYTES + escape_bytes(src_len - LITERAL_MASK as usize) + src_len
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Emission helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Append a 255-escape chain for `extra` and return the next write position.
#[inline]
fn put_escape_bytes(dst: &mut [u8], mut at: usize, mut extra: usize) -> usize {
    while extra >= 255 {
        dst[at] = 255;
        at += 1;
        extra -= 255;
    }
    dst[at] = extra as u8;
    at + 1
}

/// Copy a literal run into the destination.
///
/// Uses fixed 16-byte bursts when both buffers have room for the rounded-up
/// width; the burst may write (and read) up to 15 bytes past the logical run,
/// which is why eligibility is checked against the round-up, never assumed.
/// Falls back to an exact-length copy when the margin is missing.
#[inline]
fn put_literals(dst: &mut [u8], at: usize, src: &[u8], from: usize, len: usize) -> usize {
    let rounded = (len + COPY_STRIDE - 1) & !(COPY_STRIDE - 1);
    if at + rounded <= dst.len() && from + rounded <= src.len() {
        let mut d = at;
        let mut s = from;
        let end = at + rounded;
        while d < end {
            dst[d..d + COPY_STRIDE].copy_from_slice(&src[s..s + COPY_STRIDE]);
            d += COPY_STRIDE;
            s += COPY_STRIDE;
        }
    } else {
        dst[at..at + len].copy_from_slice(&src[from..from + len]);
    }
    at + len
}

/// Emit one literal-run + match sequence: token, literal escape chain,
/// literal bytes, match escape chain. The exact encoded size is checked
/// against the remaining capacity before the first byte is written.
#[inline]
fn put_sequence(
    dst: &mut [u8],
    mut at: usize,
    src: &[u8],
    anchor: usize,
    lit_len: usize,
    offset: u32,
    match_len: usize,
) -> Result<usize, CompressError> {
    let lit_mask = LITERAL_MASK as usize;
    let match_mask = MATCH_MASK as usize;
    let extra_match = match_len - MIN_MATCH;

    let mut need = TOKEN_BYTES + lit_len;
    if lit_len >= lit_mask {
        need += escape_bytes(lit_len - lit_mask);
    }
    if extra_match >= match_mask {
        need += escape_bytes(extra_match - match_mask);
    }
    if need > dst.len() - at {
        return Err(CompressError::OutputTooSmall);
    }

    let literal_field = lit_len.min(lit_mask) as u32;
    let match_field = extra_match.min(match_mask) as u32;
    write_token(dst, at, token_new(offset, match_field, literal_field));
    at += TOKEN_BYTES;
    if lit_len >= lit_mask {
        at = put_escape_bytes(dst, at, lit_len - lit_mask);
    }
    if lit_len > 0 {
        at = put_literals(dst, at, src, anchor, lit_len);
    }
    if extra_match >= match_mask {
        at = put_escape_bytes(dst, at, extra_match - match_mask);
    }
    Ok(at)
}

/// Emit the terminal token covering the literal tail `src[anchor..]`: an
/// offset of 0, the tail length, and the tail bytes, copied exactly.
fn put_tail(
    dst: &mut [u8],
    mut at: usize,
    src: &[u8],
    anchor: usize,
) -> Result<usize, CompressError> {
    let tail = src.len() - anchor;
    if compress_bound(tail) > dst.len() - at {
        return Err(CompressError::OutputTooSmall);
    }
    let lit_mask = LITERAL_MASK as usize;
    if tail < lit_mask {
        write_token(dst, at, token_new(0, 0, tail as u32));
        at += TOKEN_BYTES;
    } else {
        write_token(dst, at, token_new(0, 0, LITERAL_MASK));
        at += TOKEN_BYTES;
        at = put_escape_bytes(dst, at, tail - lit_mask);
    }
    dst[at..at + tail].copy_from_slice(&src[anchor..]);
    Ok(at + tail)
}

// ─────────────────────────────────────────────────────────────────────────────
// Encoder
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `src` into `dst` and return the number of bytes written.
///
/// `state` is scratch memory only; it is zeroed on entry and holds nothing
/// of value afterwards. Inputs longer than [`MAX_INPUT_SIZE`] cannot be
/// represented (16-bit offsets) and fail like any other unencodable input.
///
/// On `Err` the destination contents are unspecified; the caller stores the
/// input verbatim instead. A destination of [`compress_bound`]`(src.len())`
/// bytes never fails.
pub fn compress(
    state: &mut CompressState,
    src: &[u8],
    dst: &mut [u8],
) -> Result<usize, CompressError> {
    if src.len() > MAX_INPUT_SIZE {
        return Err(CompressError::OutputTooSmall);
    }
    state.reset();
    let len = src.len();
    let mut at = 0usize;

    'search: {
        // Probing needs two full 8-byte windows and a copy stride of slack,
        // so position 1 must sit at or before `len - COPY_STRIDE`. Inputs
        // without that room go out as a single literal tail.
        if len < COPY_STRIDE + 1 {
            break 'search;
        }
        let safe_pos = len - COPY_STRIDE;
        let mut anchor = 0usize;
        let mut r = 1usize;
        loop {
            // Find the next match: probe two adjacent positions per round,
            // then skip ahead by the accelerating step.
            let mut step = 1u32 << SKIP_TRIGGER;
            let mut q;
            loop {
                q = state.lookup_insert(hash_at(src, r), r as u16);
                if equal4(src, q, r) {
                    break;
                }
                r += 1;
                q = state.lookup_insert(hash_at(src, r), r as u16);
                if equal4(src, q, r) {
                    break;
                }
                step += 1;
                r += (step >> SKIP_TRIGGER) as usize;
                if r > safe_pos {
                    return put_tail(dst, at, src, anchor);
                }
            }

            let r_end = matching_end(src, q, r);
            let match_len = r_end - r;
            let offset = (r - q) as u32;
            at = put_sequence(dst, at, src, anchor, r - anchor, offset, match_len)?;

            r = r_end;
            if r > safe_pos {
                if r == len {
                    return Ok(at);
                }
                return put_tail(dst, at, src, r);
            }
            // Re-index the position just behind the new cursor so the match
            // region does not leave a coverage hole in the table.
            state.insert(hash_at(src, r - 1), (r - 1) as u16);
            anchor = r;
        }
    }

    put_tail(dst, at, src, 0)
}
