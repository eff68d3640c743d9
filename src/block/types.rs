//! LZ4K block constants, token packing, byte-window helpers, and the
//! scratch hash table.
//!
//! Everything format-level lives here:
//!   - Field widths and masks of the 24-bit token
//!   - Token pack/unpack and the 3-byte wire read/write
//!   - Little-endian window reads used by the hash and the match extender
//!   - The multiplicative position hash
//!   - [`CompressState`], the caller-owned scratch table
//!   - [`matching_end`], the word-wise match extension primitive

#[cfg(feature = "alloc")]
extern crate alloc;

// ─────────────────────────────────────────────────────────────────────────────
// Format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum match length encoded by a token; the match-length field stores
/// `match_len - MIN_MATCH`.
pub const MIN_MATCH: usize = 4;

/// Wire size of a packed token.
pub const TOKEN_BYTES: usize = 3;

/// Total token width in bits.
pub const TOKEN_BITS: u32 = (TOKEN_BYTES * 8) as u32;

/// Width of the backward-offset field (low bits of the token).
pub const OFFSET_BITS: u32 = 16;

/// Width of the match-length field (middle bits).
pub const MATCH_BITS: u32 = 4;

/// Width of the literal-length field (top bits).
pub const LITERAL_BITS: u32 = TOKEN_BITS - OFFSET_BITS - MATCH_BITS;

const _: () = assert!(OFFSET_BITS + MATCH_BITS + LITERAL_BITS == TOKEN_BITS);

pub const OFFSET_MASK: u32 = (1 << OFFSET_BITS) - 1;
pub const MATCH_MASK: u32 = (1 << MATCH_BITS) - 1;
pub const LITERAL_MASK: u32 = (1 << LITERAL_BITS) - 1;

/// Largest input a single block can cover: offsets are 16 bits, so matches
/// cannot reach further back than this.
pub const MAX_INPUT_SIZE: usize = 1 << OFFSET_BITS;

/// Log2 of the number of hash-table slots.
pub const HASH_LOG: u32 = 12;

/// Number of slots in the scratch hash table (one `u16` each).
pub const HASH_SLOTS: usize = 1 << HASH_LOG;

/// Search-acceleration shift: while no match is found, the probe step grows
/// by `step >> SKIP_TRIGGER` per failed probe pair, bounding encoder time on
/// incompressible input.
pub const SKIP_TRIGGER: u32 = 5;

/// Encoder literal-burst width, and the margin the search loop keeps before
/// the end of the input.
pub const COPY_STRIDE: usize = 16;

/// Decoder literal-burst width.
pub const LITERAL_STRIDE: usize = 32;

/// Decoder match-copy chunk width.
pub const MATCH_STRIDE: usize = 16;

/// Destination margin required for double-chunk match copies.
pub const MATCH_STRIDE_SAFE_2X: usize = 2 * MATCH_STRIDE - 1;

// ─────────────────────────────────────────────────────────────────────────────
// Token pack / unpack
//
// Layout, counted from the least significant bit of the 24-bit value:
//   [ literal_field:4 | match_field:4 | offset:16 ]
// An offset of 0 marks the end-of-block token.
// ─────────────────────────────────────────────────────────────────────────────

/// Compose a token from its three fields. Fields must already be saturated
/// to their mask; lengths beyond the mask are carried by escape bytes.
#[inline(always)]
pub fn token_new(offset: u32, match_field: u32, literal_field: u32) -> u32 {
    debug_assert!(offset <= OFFSET_MASK);
    debug_assert!(match_field <= MATCH_MASK);
    debug_assert!(literal_field <= LITERAL_MASK);
    offset | (match_field << OFFSET_BITS) | (literal_field << (OFFSET_BITS + MATCH_BITS))
}

#[inline(always)]
pub fn token_offset(token: u32) -> u32 {
    token & OFFSET_MASK
}

#[inline(always)]
pub fn token_match_field(token: u32) -> u32 {
    (token >> OFFSET_BITS) & MATCH_MASK
}

#[inline(always)]
pub fn token_literal_field(token: u32) -> u32 {
    token >> (OFFSET_BITS + MATCH_BITS)
}

/// Read a token as an explicit 3-byte little-endian value.
///
/// Callers must have verified that `at + TOKEN_BYTES <= src.len()`; no byte
/// beyond the third is touched.
#[inline(always)]
pub fn read_token(src: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([src[at], src[at + 1], src[at + 2], 0])
}

/// Write the low 24 bits of `token` at `dst[at..at + TOKEN_BYTES]`.
#[inline(always)]
pub fn write_token(dst: &mut [u8], at: usize, token: u32) {
    let b = token.to_le_bytes();
    dst[at] = b[0];
    dst[at + 1] = b[1];
    dst[at + 2] = b[2];
}

// ─────────────────────────────────────────────────────────────────────────────
// Byte-window reads
//
// All reads go through `from_le_bytes`, so hashing and mismatch location
// behave identically on big-endian hosts.
// ─────────────────────────────────────────────────────────────────────────────

#[inline(always)]
pub fn read4(src: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&src[at..at + 4]);
    u32::from_le_bytes(buf)
}

#[inline(always)]
pub fn read8(src: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&src[at..at + 8]);
    u64::from_le_bytes(buf)
}

/// True when the 4-byte windows at `a` and `b` are equal.
#[inline(always)]
pub fn equal4(src: &[u8], a: usize, b: usize) -> bool {
    read4(src, a) == read4(src, b)
}

// ─────────────────────────────────────────────────────────────────────────────
// Position hash
// ─────────────────────────────────────────────────────────────────────────────

/// Multiplier for the 5-byte-window hash. The pre-shift of 24 discards the
/// top three bytes of the 8-byte read, so the hash covers bytes 0..5 of the
/// window. A 6-byte variant (`227_718_039_650_203`, pre-shift 16) computes
/// faster but finds fewer matches; this build uses the 5-byte hash
/// throughout and never mixes the two.
pub const HASH_PRIME: u64 = 889_523_592_379;

const HASH_UP_SHIFT: u32 = 24;

/// Hash an 8-byte little-endian window down to a table slot index.
#[inline(always)]
pub fn hash8(window: u64) -> usize {
    (((window << HASH_UP_SHIFT).wrapping_mul(HASH_PRIME)) >> (64 - HASH_LOG)) as usize
}

/// Hash the window starting at `at`. Needs 8 readable bytes.
#[inline(always)]
pub fn hash_at(src: &[u8], at: usize) -> usize {
    hash8(read8(src, at))
}

// ─────────────────────────────────────────────────────────────────────────────
// Scratch hash table
// ─────────────────────────────────────────────────────────────────────────────

/// Caller-owned scratch memory for [`compress`](crate::block::compress::compress).
///
/// A direct-mapped table of [`HASH_SLOTS`] 16-bit positions: each slot holds
/// the most recent input position whose window hashed there. Collisions
/// evict the previous occupant, which costs ratio, never correctness - the
/// evicted candidate was still valid data, it is simply no longer reachable.
///
/// The table is re-zeroed at the start of every compression call, so a state
/// value carries nothing between calls and may be reused freely. It is not
/// shareable: concurrent compressions need one state each.
pub struct CompressState {
    table: [u16; HASH_SLOTS],
}

impl CompressState {
    /// A zeroed state, ready for use.
    pub const fn new() -> Self {
        Self {
            table: [0u16; HASH_SLOTS],
        }
    }

    /// A zeroed state on the heap, for callers that cannot spare the stack
    /// space (the table is `2 * HASH_SLOTS` bytes).
    #[cfg(feature = "alloc")]
    pub fn new_boxed() -> alloc::boxed::Box<Self> {
        alloc::boxed::Box::new(Self::new())
    }

    /// Zero every slot. `compress` calls this on entry.
    pub fn reset(&mut self) {
        self.table.fill(0);
    }

    /// Read the previous occupant of `hash` and replace it with `pos`.
    #[inline(always)]
    pub fn lookup_insert(&mut self, hash: usize, pos: u16) -> usize {
        let prev = self.table[hash];
        self.table[hash] = pos;
        prev as usize
    }

    /// Overwrite slot `hash` with `pos` without reading it.
    #[inline(always)]
    pub fn insert(&mut self, hash: usize, pos: u16) {
        self.table[hash] = pos;
    }
}

impl Default for CompressState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match extension
// ─────────────────────────────────────────────────────────────────────────────

/// Extend a match forward and return its exclusive end position.
///
/// `q` and `r` must already be known to share their first [`MIN_MATCH`]
/// bytes, with `q < r`. Comparison proceeds 8 bytes at a time: a zero XOR
/// means all 8 bytes agree; otherwise the lowest set bit locates the first
/// differing byte. Word compares stop while a full 8-byte read still fits,
/// and the last at-most-7 bytes are compared individually.
#[inline]
pub fn matching_end(src: &[u8], mut q: usize, mut r: usize) -> usize {
    debug_assert!(q < r);
    q += MIN_MATCH;
    r += MIN_MATCH;
    while r + 8 <= src.len() {
        let x = read8(src, q) ^ read8(src, r);
        if x != 0 {
            return r + (x.trailing_zeros() >> 3) as usize;
        }
        q += 8;
        r += 8;
    }
    while r < src.len() && src[q] == src[r] {
        q += 1;
        r += 1;
    }
    r
}
