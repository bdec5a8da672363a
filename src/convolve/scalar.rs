//! Scalar GF(2) convolution.
//!
//! Splits the output range into a short *head* (output positions whose
//! window reaches before the start of this call's input, handled with an
//! incrementally shifted register seeded from `fill`) and a *bulk* region
//! (output positions whose window lies entirely within this call's input,
//! computed directly from an unaligned load).

use crate::error::ConvolveError;
use crate::mem::load_u64_le;
use crate::storage::BitStorage;

/// Number of output bits produced by one register load before a fresh load
/// is needed, matching the "reload every 32 output steps" guidance.
const BULK_BATCH: usize = 32;

/// Low `taps` bits mask for a tap count `t` (`0 <= t <= 32`).
#[inline]
pub(crate) fn taps_mask_for(t: usize) -> u64 {
    (1u64 << t) - 1
}

/// Reads `taps` (length `t <= 32`) into a `u64` mask, bit `i` of the
/// storage landing at bit `i` of the mask.
pub(crate) fn read_taps_mask(taps: &BitStorage) -> u64 {
    let t = taps.size();
    if t == 0 {
        return 0;
    }
    load_u64_le(taps.data(), 0) & taps_mask_for(t)
}

/// Validates `taps`/`result` against the convolution contract, returning
/// `(taps_len, output_len)` on success.
pub(crate) fn validate(taps: &BitStorage, bits: &BitStorage, result: &BitStorage, flush: bool) -> Result<(usize, usize), ConvolveError> {
    let t = taps.size();
    if t > 32 {
        return Err(ConvolveError::RangeError);
    }
    let b = bits.size();
    let out_len = if flush { t + b - 1 } else { b };
    if result.size() < out_len {
        return Err(ConvolveError::CapacityError);
    }
    Ok((t, out_len))
}

/// Bit `k` of the input stream, `0` past the real end (the flush tail is
/// handled this way for the head loop; the bulk loop gets the same
/// zero-padding for free from the tail-zero guard instead).
#[inline]
fn input_bit(bits: &BitStorage, k: usize) -> bool {
    if k < bits.size() {
        bits.get(k)
    } else {
        false
    }
}

/// Computes the `t`-bit window ending at absolute input position `k`
/// (`k >= t - 1` required) directly from an unaligned load, returning it in
/// the low `t` bits.
#[inline]
pub(crate) fn window_at(bits_data: &[u8], k: usize, t: usize) -> u64 {
    let start = k - (t - 1);
    load_u64_le(bits_data, start / 8) >> (start % 8)
}

/// Runs the register-seeded head loop for output positions `0..head_len`,
/// returning the register value after the last head step (meaningful only
/// when the whole output fits in the head, i.e. `head_len == out_len`).
pub(crate) fn run_head(taps_mask: u64, t: usize, bits: &BitStorage, result: &mut BitStorage, fill: u32, head_len: usize) -> u64 {
    let mut reg = (fill as u64) & taps_mask_for(t);
    for k in 0..head_len {
        let new_bit = input_bit(bits, k) as u64;
        reg = (reg >> 1) | (new_bit << (t - 1));
        result.set(k, (reg & taps_mask).count_ones() & 1 == 1);
    }
    reg
}

/// Runs the bulk loop for output positions `start..end` (`start >= t - 1`
/// required), reloading the register every [`BULK_BATCH`] steps.
pub(crate) fn run_bulk(taps_mask: u64, t: usize, bits_data: &[u8], result: &mut BitStorage, start: usize, end: usize) {
    let mut k = start;
    while k < end {
        let batch = BULK_BATCH.min(end - k);
        let mut cur = window_at(bits_data, k, t);
        for s in 0..batch {
            result.set(k + s, (cur & taps_mask).count_ones() & 1 == 1);
            cur >>= 1;
        }
        k += batch;
    }
}

/// Scalar GF(2) convolution of `taps` (at most 32 bits) over `bits`.
pub fn convolve_scalar(taps: &BitStorage, bits: &BitStorage, result: &mut BitStorage, flush: bool, fill: u32) -> Result<u32, ConvolveError> {
    let (t, out_len) = validate(taps, bits, result, flush)?;

    if t == 0 {
        for k in 0..out_len {
            result.set(k, false);
        }
        return Ok(fill);
    }

    let taps_mask = read_taps_mask(taps);
    let head_len = (t - 1).min(out_len);

    let reg_after_head = run_head(taps_mask, t, bits, result, fill, head_len);
    run_bulk(taps_mask, t, bits.data(), result, head_len, out_len);

    let new_fill = if out_len == 0 {
        fill
    } else if head_len == out_len {
        reg_after_head as u32
    } else {
        (window_at(bits.data(), out_len - 1, t) & taps_mask_for(t)) as u32
    };

    Ok(new_fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Lcg(u64);
    impl Lcg {
        fn next_bit(&mut self) -> bool {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
            (self.0 >> 33) & 1 != 0
        }
    }

    fn naive_bit(taps: &[bool], input: &[bool], k: usize) -> bool {
        let t = taps.len();
        let mut acc = false;
        for j in 0..t {
            let idx = k as isize - (t as isize - 1) + j as isize;
            let bit = if idx >= 0 && (idx as usize) < input.len() {
                input[idx as usize]
            } else {
                false
            };
            acc ^= taps[j] & bit;
        }
        acc
    }

    fn make_storage(bits: &[bool]) -> BitStorage {
        let mut s = BitStorage::zeroed(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            s.set(i, b);
        }
        s
    }

    #[test]
    fn flush_matches_naive_full_convolution() {
        let taps_bits = vec![true, false, true, true, false, true, true, true, false, true, true, true, true, false, true, true, true, true, true];
        let t = taps_bits.len();
        assert_eq!(t, 19);

        let mut rng = Lcg(7);
        let b = 5000;
        let input: Vec<bool> = (0..b).map(|_| rng.next_bit()).collect();

        let taps = make_storage(&taps_bits);
        let bits = make_storage(&input);
        let mut result = BitStorage::zeroed(t + b - 1);

        let fill = convolve_scalar(&taps, &bits, &mut result, true, 0).unwrap();
        let _ = fill;

        for k in 0..(t + b - 1) {
            assert_eq!(result.get(k), naive_bit(&taps_bits, &input, k), "k={k}");
        }
    }

    #[test]
    fn no_flush_has_exactly_b_outputs_matching_naive() {
        let taps_bits = vec![true, false, true, true, false, true, true, true, false, true, true, true, true, false, true, true, true, true, true];
        let t = taps_bits.len();

        let mut rng = Lcg(7);
        let b = 4096 + 17;
        let input: Vec<bool> = (0..b).map(|_| rng.next_bit()).collect();

        let taps = make_storage(&taps_bits);
        let bits = make_storage(&input);
        let mut result = BitStorage::zeroed(b);

        convolve_scalar(&taps, &bits, &mut result, false, 0).unwrap();

        for k in 0..b {
            assert_eq!(result.get(k), naive_bit(&taps_bits, &input, k), "k={k}");
        }
    }

    #[test]
    fn continuation_matches_single_flush_call() {
        let taps_bits: Vec<bool> = vec![true, true, false, true, false, true, true, false, true, true, true, false, true, false, true, false, true, true, true];
        let t = taps_bits.len();

        let mut rng = Lcg(7);
        let total = 8192;
        let input: Vec<bool> = (0..total).map(|_| rng.next_bit()).collect();
        let split = total / 2;

        let taps = make_storage(&taps_bits);
        let whole_bits = make_storage(&input);
        let mut expected = BitStorage::zeroed(t + total - 1);
        convolve_scalar(&taps, &whole_bits, &mut expected, true, 0).unwrap();

        let half1 = make_storage(&input[..split]);
        let half2 = make_storage(&input[split..]);

        let mut out1 = BitStorage::zeroed(split);
        let fill_after_1 = convolve_scalar(&taps, &half1, &mut out1, false, 0).unwrap();

        let mut out2 = BitStorage::zeroed(t + (total - split) - 1);
        convolve_scalar(&taps, &half2, &mut out2, true, fill_after_1).unwrap();

        for k in 0..split {
            assert_eq!(out1.get(k), expected.get(k), "k={k}");
        }
        for k in 0..(t + (total - split) - 1) {
            assert_eq!(out2.get(k), expected.get(split + k), "k={k}");
        }
    }

    #[test]
    fn capacity_error_leaves_result_untouched() {
        let taps = make_storage(&[true, true, true]);
        let bits = make_storage(&[true, false, true, true, false]);
        let mut result = BitStorage::zeroed(1); // way too small
        let before = result.clone();

        let err = convolve_scalar(&taps, &bits, &mut result, true, 0).unwrap_err();
        assert_eq!(err, ConvolveError::CapacityError);
        assert_eq!(result, before);
    }

    #[test]
    fn range_error_on_taps_too_wide() {
        let taps = make_storage(&[true; 33]);
        let bits = make_storage(&[true; 10]);
        let mut result = BitStorage::zeroed(100);

        let err = convolve_scalar(&taps, &bits, &mut result, true, 0).unwrap_err();
        assert_eq!(err, ConvolveError::RangeError);
    }

    #[test]
    fn zero_taps_produces_all_zero_output() {
        let taps = BitStorage::zeroed(0);
        let bits = make_storage(&[true, true, false, true]);
        let mut result = BitStorage::zeroed(4);

        convolve_scalar(&taps, &bits, &mut result, false, 0).unwrap();
        for k in 0..4 {
            assert!(!result.get(k));
        }
    }
}
