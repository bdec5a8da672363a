//! Error types returned by the kernels in this crate.
//!
//! Mirrors the plain, data-less error enums used by the block compression
//! layer this crate's unaligned-load techniques are modeled on
//! (`Lz4Error`, `DecompressError`): no `std::error::Error`/`Display` impl is
//! provided here, since formatting an error for a human is a caller
//! concern, not this layer's.

/// Errors returned by [`crate::convolve::convolve`] and its scalar/SIMD
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvolveError {
    /// `result` is too small to hold the requested convolution's output.
    CapacityError,
    /// `taps.size()` exceeds the maximum supported tap count (32).
    RangeError,
}
