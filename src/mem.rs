//! Unaligned little-endian memory helpers.
//!
//! Every kernel reads multi-byte words from arbitrary byte offsets inside a
//! `BitStorage`'s buffer. All such reads go through [`load_u64_le`] so there
//! is exactly one place that needs auditing for the tail-zero-guard
//! precondition every caller relies on.

/// Loads 8 bytes starting at `bytes[idx..idx + 8]` as a little-endian `u64`.
///
/// # Safety
///
/// `idx + 8 <= bytes.len()` must hold. Every kernel establishes this via the
/// tail-zero guard: a `BitStorage` of logical length `n` always has at least
/// `ceil(n / 8) + 7` bytes, so any byte index up to and including the last
/// logical byte can load a further 7 bytes without going out of bounds.
#[inline(always)]
pub fn load_u64_le(bytes: &[u8], idx: usize) -> u64 {
    debug_assert!(idx + 8 <= bytes.len(), "unaligned load past tail guard");
    // SAFETY: caller (transitively, every kernel entry point) guarantees the
    // tail-zero-guard precondition checked above.
    let raw = unsafe { (bytes.as_ptr().add(idx) as *const u64).read_unaligned() };
    u64::from_le(raw)
}
