//! AND-popcount inner product over two unaligned bit sub-ranges.
//!
//! Exposes the scalar and 128-bit (SSE2) variants individually — required
//! to be bit-identical, and each independently testable — plus a
//! dispatching [`dot_prod`] entry point that picks the widest variant
//! available on the current target, the Rust stand-in for the C++
//! source's `__attribute__((target(...)))` function multi-versioning.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod simd128;

pub use scalar::dot_prod_scalar;

#[cfg(target_arch = "x86_64")]
pub use simd128::dot_prod_sse2;

use crate::storage::BitStorage;

/// Population count of the bitwise AND of the `len`-bit ranges of `a` and
/// `b` starting at bit offsets `start_a` / `start_b`.
///
/// # Panics (debug only)
///
/// Panics in debug builds if either range would extend past its storage's
/// logical end by more than the 7-byte tail-zero guard allows; this is a
/// contract violation, not a recoverable error.
pub fn dot_prod(a: &BitStorage, start_a: usize, b: &BitStorage, start_b: usize, len: usize) -> u64 {
    debug_assert!(start_a + len <= a.size() + 7 * 8, "DotProd range exceeds tail guard");
    debug_assert!(start_b + len <= b.size() + 7 * 8, "DotProd range exceeds tail guard");

    #[cfg(target_arch = "x86_64")]
    {
        // SSE2 is guaranteed present on every x86_64 target by the platform
        // ABI, so no runtime feature probe is needed here (contrast with
        // the AVX2 paths in `convolve`, which are not baseline and do
        // probe at runtime).
        unsafe { simd128::dot_prod_sse2(a.data(), start_a, b.data(), start_b, len) }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        scalar::dot_prod_scalar(a.data(), start_a, b.data(), start_b, len)
    }
}
