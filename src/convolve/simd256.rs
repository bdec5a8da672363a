//! 256-bit (AVX2) bulk convolution: four independent 32-output-bit lanes
//! per iteration. Unlike SSE2, AVX2 is not part of the x86_64 baseline ABI,
//! so [`crate::convolve::convolve`] probes for it at runtime before calling
//! in here (mirrors the `expand_null_bitmap` dispatch pattern used for
//! non-baseline SIMD elsewhere in the ecosystem).

use core::arch::x86_64::{__m256i, _mm256_set_epi64x, _mm256_storeu_si256};

use super::scalar::run_bulk;
use crate::mem::load_u64_le;

const LANE_BITS: usize = 32;
const WIDE_OUTPUT_BITS: usize = 4 * LANE_BITS;

/// AVX2 bulk convolution for output positions `start..end`, `start >= t - 1`
/// required. Falls back to the scalar bulk loop for the remainder that
/// doesn't fill a whole 128-output-bit iteration.
///
/// # Safety
///
/// Caller must ensure the `avx2` target feature is available (checked via
/// `is_x86_feature_detected!` in [`crate::convolve::convolve`]) and that
/// `bits_data` carries the tail-zero guard far enough past `end` to cover
/// every lane's load.
#[target_feature(enable = "avx2")]
pub unsafe fn convolve_bulk_avx2(taps_mask: u64, t: usize, bits_data: &[u8], result: &mut crate::storage::BitStorage, start: usize, end: usize) {
    let mut k = start;

    while k + WIDE_OUTPUT_BITS <= end {
        let mut words = [0i64; 4];
        for (lane, word) in words.iter_mut().enumerate() {
            let lane_start = k + lane * LANE_BITS - (t - 1);
            *word = (load_u64_le(bits_data, lane_start / 8) >> (lane_start % 8)) as i64;
        }

        let windows = _mm256_set_epi64x(words[3], words[2], words[1], words[0]);

        let mut lanes = [0u64; 4];
        _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, windows);

        // Shift each lane's raw window right by `s` first, then mask with
        // `taps_mask`, same order as the scalar bulk loop (masking before
        // the shift would permanently discard bits later steps still need).
        for (lane, &window) in lanes.iter().enumerate() {
            for s in 0..LANE_BITS {
                result.set(k + lane * LANE_BITS + s, ((window >> s) & taps_mask).count_ones() & 1 == 1);
            }
        }

        k += WIDE_OUTPUT_BITS;
    }

    run_bulk(taps_mask, t, bits_data, result, k, end);
}
