//! 128-bit (SSE2) `DotProd`: each iteration consumes 112 bits (two
//! overlapping 56-bit halves) using two unaligned 64-bit loads offset by
//! 7 bytes, assembled into one `__m128i`.
//!
//! SSE2 is part of the x86_64 baseline ABI, so no runtime feature check is
//! needed to call this from [`crate::dotprod::dot_prod`] on that target.

use core::arch::x86_64::{__m128i, _mm_and_si128, _mm_set_epi64x, _mm_slli_epi64, _mm_srli_epi64, _mm_storeu_si128};

use super::scalar::dot_prod_scalar;
use crate::mem::load_u64_le;

/// Bits consumed per wide iteration: two overlapping 56-bit scalar chunks.
const WIDE_CHUNK_BITS: usize = 112;

/// SSE2 variant of [`dot_prod_scalar`]; must produce bit-identical output
/// for every input.
///
/// # Safety
///
/// Caller must ensure the `sse2` target feature is available (guaranteed on
/// `x86_64`), and the same byte-availability precondition as
/// [`dot_prod_scalar`].
#[target_feature(enable = "sse2")]
pub unsafe fn dot_prod_sse2(a_bytes: &[u8], start_a: usize, b_bytes: &[u8], start_b: usize, len: usize) -> u64 {
    let mut accum: u64 = 0;
    let mut cur_a = start_a;
    let mut cur_b = start_b;
    let mut remaining = len;

    while remaining >= WIDE_CHUNK_BITS {
        let a_vec = load_shifted_lanes(a_bytes, cur_a);
        let b_vec = load_shifted_lanes(b_bytes, cur_b);

        // AND the two sides, then shift each 64-bit lane left by 8 to drop
        // the overlap byte each load brought in — the top 8 bits fall off
        // the lane, the low 56 valid bits move up to fill [8, 64), and
        // popcount is unaffected by the translation.
        let anded = _mm_slli_epi64(_mm_and_si128(a_vec, b_vec), 8);

        let mut lanes = [0u64; 2];
        _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, anded);
        accum += lanes[0].count_ones() as u64 + lanes[1].count_ones() as u64;

        cur_a += WIDE_CHUNK_BITS;
        cur_b += WIDE_CHUNK_BITS;
        remaining -= WIDE_CHUNK_BITS;
    }

    accum + dot_prod_scalar(a_bytes, cur_a, b_bytes, cur_b, remaining)
}

/// Loads the two overlapping 64-bit words for one 112-bit chunk starting at
/// bit offset `start`, right-shifted per-lane by the sub-byte position so
/// lane 0 holds bits `[start, start+64)` and lane 1 holds
/// `[start+56, start+120)`, each starting at bit 0 of its lane.
#[target_feature(enable = "sse2")]
unsafe fn load_shifted_lanes(bytes: &[u8], start: usize) -> __m128i {
    let byte = start / 8;
    let pos = (start % 8) as i32;

    let lo = load_u64_le(bytes, byte) as i64;
    let hi = load_u64_le(bytes, byte + 7) as i64;

    let vec = _mm_set_epi64x(hi, lo);
    _mm_srli_epi64(vec, pos)
}
