//! Offset-aware AND-popcount dot product and GF(2) convolution kernels
//! over packed bit-vectors.
//!
//! [`BitStorage`] is the packed container every kernel operates on; bit
//! ranges may start at any offset, not just byte boundaries, which is the
//! reason every kernel in [`dotprod`] and [`convolve`] reaches for
//! unaligned loads instead of byte-wise iteration.
//!
//! Both kernel families ship scalar and SIMD variants that are required to
//! be bit-identical; each module's public dispatcher (`dot_prod`,
//! `convolve`) picks the widest variant available on the current target.

pub mod convolve;
pub mod dotprod;
pub mod error;
pub mod mem;
pub mod storage;

pub use convolve::convolve;
pub use dotprod::dot_prod;
pub use error::ConvolveError;
pub use storage::{BitRef, BitStorage};
