//! GF(2) convolution: slides a `taps`-bit window (`taps.size() <= 32`) over
//! `bits`, emitting the parity of the AND of the window with `taps` at
//! every position. Supports streaming across calls via `fill`/the returned
//! continuation fill, and an optional `flush` tail that drains the last
//! `taps.size() - 1` partial windows.
//!
//! Like [`crate::dotprod`], this is a dispatcher over scalar/SSE2/AVX2
//! variants that are each independently testable and required to be
//! bit-identical. Unlike DotProd, AVX2 is not x86_64 baseline, so the AVX2
//! path is gated behind a runtime [`is_x86_feature_detected!`] probe; SSE2
//! is used unconditionally, same as in `dotprod`.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod simd128;
#[cfg(target_arch = "x86_64")]
pub mod simd256;

pub use scalar::convolve_scalar;

use crate::error::ConvolveError;
use crate::storage::BitStorage;

/// Runs the GF(2) convolution of `bits` against `taps`, writing output bits
/// into `result` starting at index 0.
///
/// When `flush` is `false`, exactly `bits.size()` output bits are produced
/// (the tail `taps.size() - 1` partial windows are deferred to a later call
/// seeded with the returned fill). When `flush` is `true`,
/// `taps.size() + bits.size() - 1` output bits are produced, with the
/// implicit zero-padding past the end of `bits` folded in for free by the
/// tail-zero guard.
///
/// `fill` seeds the low `taps.size()` bits of the initial shift register —
/// pass `0` for a fresh stream, or the value returned by the previous call
/// to continue one.
///
/// # Errors
///
/// Returns [`ConvolveError::RangeError`] if `taps.size() > 32`, or
/// [`ConvolveError::CapacityError`] if `result` is too small to hold the
/// output — in both cases `result` is left unchanged.
pub fn convolve(taps: &BitStorage, bits: &BitStorage, result: &mut BitStorage, flush: bool, fill: u32) -> Result<u32, ConvolveError> {
    let (t, out_len) = scalar::validate(taps, bits, result, flush)?;

    if t == 0 {
        for k in 0..out_len {
            result.set(k, false);
        }
        return Ok(fill);
    }

    let taps_mask = scalar::read_taps_mask(taps);
    let head_len = (t - 1).min(out_len);

    let reg_after_head = scalar::run_head(taps_mask, t, bits, result, fill, head_len);
    run_bulk_dispatch(taps_mask, t, bits.data(), result, head_len, out_len);

    let new_fill = if out_len == 0 {
        fill
    } else if head_len == out_len {
        reg_after_head as u32
    } else {
        (scalar::window_at(bits.data(), out_len - 1, t) & scalar::taps_mask_for(t)) as u32
    };

    Ok(new_fill)
}

/// Picks the widest bulk-region kernel available on the current target.
fn run_bulk_dispatch(taps_mask: u64, t: usize, bits_data: &[u8], result: &mut BitStorage, start: usize, end: usize) {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            unsafe { simd256::convolve_bulk_avx2(taps_mask, t, bits_data, result, start, end) };
            return;
        }
        // SSE2 needs no runtime probe: baseline on every x86_64 target.
        unsafe { simd128::convolve_bulk_sse2(taps_mask, t, bits_data, result, start, end) };
        return;
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        scalar::run_bulk(taps_mask, t, bits_data, result, start, end);
    }
}
