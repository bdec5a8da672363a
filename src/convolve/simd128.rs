//! 128-bit (SSE2) bulk convolution: computes two independent 32-output-bit
//! lanes per iteration, each lane an independent instance of the same
//! direct-windowed-load primitive the scalar bulk loop uses — there is no
//! register carried between lanes, so lanes can run in parallel.

use core::arch::x86_64::{__m128i, _mm_set_epi64x, _mm_storeu_si128};

use super::scalar::run_bulk;
use crate::mem::load_u64_le;

/// Output bits produced per SSE2 iteration (two 32-bit lanes).
const LANE_BITS: usize = 32;
const WIDE_OUTPUT_BITS: usize = 2 * LANE_BITS;

/// SSE2 bulk convolution for output positions `start..end`, `start >= t - 1`
/// required (the head region must already be handled by the caller).
/// Falls back to the scalar bulk loop for the `< 64`-output remainder.
///
/// # Safety
///
/// Caller must ensure the `sse2` target feature is available (guaranteed on
/// `x86_64`) and that `bits_data` carries the tail-zero guard far enough
/// past `end` to cover both lanes' loads.
#[target_feature(enable = "sse2")]
pub unsafe fn convolve_bulk_sse2(taps_mask: u64, t: usize, bits_data: &[u8], result: &mut crate::storage::BitStorage, start: usize, end: usize) {
    let mut k = start;

    while k + WIDE_OUTPUT_BITS <= end {
        let lane0_start = k - (t - 1);
        let lane1_start = k + LANE_BITS - (t - 1);

        let w0 = (load_u64_le(bits_data, lane0_start / 8) >> (lane0_start % 8)) as i64;
        let w1 = (load_u64_le(bits_data, lane1_start / 8) >> (lane1_start % 8)) as i64;

        let windows = _mm_set_epi64x(w1, w0);

        let mut lanes = [0u64; 2];
        _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, windows);

        // Each lane holds its own raw window; shift right by `s` first,
        // then mask with `taps_mask`, same order as the scalar bulk loop
        // (masking before the shift would permanently discard bits that
        // later steps in the same batch still need).
        for s in 0..LANE_BITS {
            result.set(k + s, ((lanes[0] >> s) & taps_mask).count_ones() & 1 == 1);
        }
        for s in 0..LANE_BITS {
            result.set(k + LANE_BITS + s, ((lanes[1] >> s) & taps_mask).count_ones() & 1 == 1);
        }

        k += WIDE_OUTPUT_BITS;
    }

    run_bulk(taps_mask, t, bits_data, result, k, end);
}
