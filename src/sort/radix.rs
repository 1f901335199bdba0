//! Radix sort for the four sort lane types (§4.6). LSD (least-significant-digit-first) radix:
//! histogram each digit, exclusive-prefix-sum the histogram into starting offsets, stably
//! scatter every element into its bucket. SIMD has no real role here beyond accelerating the
//! histogram extraction in a hand-tuned build (shift/mask/increment is embarrassingly
//! parallel per-lane but the increments collide across lanes); this implementation keeps the
//! histogram and scatter both scalar, which is the correct fallback Highway itself documents
//! for the non-intrinsic path.
//!
//! Below [`RADIX_SORT_THRESHOLD`] elements the fixed per-pass overhead (histogram + temp
//! buffer allocation) isn't worth it, so small inputs go through a library comparison sort
//! instead.

use super::sortable::{sortable_u32, sortable_u64, unsortable_u32, unsortable_u64};

/// Below this length, radix sort dispatches to a library comparison sort: the temp-buffer
/// allocation and histogram passes have fixed overhead a comparison sort's zero-allocation
/// path beats for small `n`.
pub const RADIX_SORT_THRESHOLD: usize = 16_000;

/// One LSD pass: bucket every element of `keys`/`vals` by `bucket_of(key)`, writing the
/// stably-scattered result to `keys_out`/`vals_out`.
fn radix_pass<T: Copy, K: Copy>(
    keys: &[K],
    vals: &[T],
    keys_out: &mut [K],
    vals_out: &mut [T],
    buckets: usize,
    bucket_of: impl Fn(K) -> usize,
) {
    let mut counts = vec![0usize; buckets];
    for &k in keys {
        counts[bucket_of(k)] += 1;
    }
    let mut offsets = vec![0usize; buckets];
    let mut sum = 0;
    for (b, offset) in offsets.iter_mut().enumerate() {
        *offset = sum;
        sum += counts[b];
    }
    for i in 0..keys.len() {
        let b = bucket_of(keys[i]);
        keys_out[offsets[b]] = keys[i];
        vals_out[offsets[b]] = vals[i];
        offsets[b] += 1;
    }
}

/// Runs `passes` LSD 8-bit-digit rounds over `keys` (sorting `vals` alongside), ping-ponging
/// between two scratch buffers, and leaves the final sorted `vals` in `out`.
fn radix_sort_u32_keyed<T: Copy>(vals_in: &[T], mut keys: Vec<u32>, out: &mut [T]) {
    let n = vals_in.len();
    let mut vals = vals_in.to_vec();
    let mut keys_tmp = vec![0u32; n];
    let mut vals_tmp = vals_in.to_vec();
    for pass in 0..4u32 {
        let shift = pass * 8;
        radix_pass(&keys, &vals, &mut keys_tmp, &mut vals_tmp, 256, |k| {
            ((k >> shift) & 0xFF) as usize
        });
        std::mem::swap(&mut keys, &mut keys_tmp);
        std::mem::swap(&mut vals, &mut vals_tmp);
    }
    out.copy_from_slice(&vals);
}

/// As [`radix_sort_u32_keyed`] but four 16-bit-digit passes over a `u64` key, for the 64-bit
/// lane types.
fn radix_sort_u64_keyed<T: Copy>(vals_in: &[T], mut keys: Vec<u64>, out: &mut [T]) {
    let n = vals_in.len();
    let mut vals = vals_in.to_vec();
    let mut keys_tmp = vec![0u64; n];
    let mut vals_tmp = vals_in.to_vec();
    for pass in 0..4u32 {
        let shift = pass * 16;
        radix_pass(&keys, &vals, &mut keys_tmp, &mut vals_tmp, 65536, |k| {
            ((k >> shift) & 0xFFFF) as usize
        });
        std::mem::swap(&mut keys, &mut keys_tmp);
        std::mem::swap(&mut vals, &mut vals_tmp);
    }
    out.copy_from_slice(&vals);
}

/// Sorts `a` ascending. Below [`RADIX_SORT_THRESHOLD`] elements, falls back to
/// [`slice::sort_unstable`].
///
/// Keys are the raw two's-complement bit pattern with the sign bit flipped, which is
/// order-preserving for `i32` and turns the last digit pass into an ordinary unsigned pass —
/// equivalent to, and simpler than, special-casing the final pass's bucket order the way
/// `spec.md` describes it.
pub fn radix_sort_i32(a: &mut [i32]) {
    if a.len() < RADIX_SORT_THRESHOLD {
        a.sort_unstable();
        return;
    }
    let keys: Vec<u32> = a.iter().map(|&x| (x as u32) ^ 0x8000_0000).collect();
    let snapshot = a.to_vec();
    radix_sort_u32_keyed(&snapshot, keys, a);
}

/// Sorts `a` ascending; see [`radix_sort_i32`].
pub fn radix_sort_i64(a: &mut [i64]) {
    if a.len() < RADIX_SORT_THRESHOLD {
        a.sort_unstable();
        return;
    }
    let keys: Vec<u64> = a.iter().map(|&x| (x as u64) ^ 0x8000_0000_0000_0000).collect();
    let snapshot = a.to_vec();
    radix_sort_u64_keyed(&snapshot, keys, a);
}

/// Sorts `a` ascending using the total order over floats (`-0.0 == 0.0`, every NaN bit
/// pattern preserved but placed consistently per [`sortable_u32`]'s bijection).
pub fn radix_sort_f32(a: &mut [f32]) {
    if a.len() < RADIX_SORT_THRESHOLD {
        a.sort_unstable_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
        return;
    }
    let keys: Vec<u32> = a.iter().map(|x| sortable_u32(x.to_bits())).collect();
    let mut sorted_keys = vec![0u32; a.len()];
    radix_sort_u32_keyed(&keys, keys.clone(), &mut sorted_keys);
    for (slot, key) in a.iter_mut().zip(sorted_keys) {
        *slot = f32::from_bits(unsortable_u32(key));
    }
}

/// Sorts `a` ascending; see [`radix_sort_f32`].
pub fn radix_sort_f64(a: &mut [f64]) {
    if a.len() < RADIX_SORT_THRESHOLD {
        a.sort_unstable_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
        return;
    }
    let keys: Vec<u64> = a.iter().map(|x| sortable_u64(x.to_bits())).collect();
    let mut sorted_keys = vec![0u64; a.len()];
    radix_sort_u64_keyed(&keys, keys.clone(), &mut sorted_keys);
    for (slot, key) in a.iter_mut().zip(sorted_keys) {
        *slot = f64::from_bits(unsortable_u64(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_input_uses_library_sort_path() {
        let mut a = vec![5, 3, 1, 4, 1, 5, 9, 2, 6];
        let mut expected = a.clone();
        expected.sort();
        radix_sort_i32(&mut a);
        assert_eq!(a, expected);
    }

    #[test]
    fn large_i32_input_matches_comparison_sort() {
        let n = RADIX_SORT_THRESHOLD + 5000;
        let mut a: Vec<i32> = (0..n as i32).map(|i| (i * 2654435761u32 as i64 % 200_000 - 100_000) as i32).collect();
        let mut expected = a.clone();
        expected.sort();
        radix_sort_i32(&mut a);
        assert_eq!(a, expected);
    }

    #[test]
    fn large_i64_input_matches_comparison_sort() {
        let n = RADIX_SORT_THRESHOLD + 1000;
        let mut a: Vec<i64> = (0..n as i64).map(|i| i * 7919 % 1_000_000 - 500_000).collect();
        let mut expected = a.clone();
        expected.sort();
        radix_sort_i64(&mut a);
        assert_eq!(a, expected);
    }

    #[test]
    fn large_f32_input_matches_comparison_sort() {
        let n = RADIX_SORT_THRESHOLD + 2000;
        let mut a: Vec<f32> = (0..n as i32).map(|i| ((i * 48271) % 100_000) as f32 / 10.0 - 5000.0).collect();
        let mut expected = a.clone();
        expected.sort_by(|x, y| x.partial_cmp(y).unwrap());
        radix_sort_f32(&mut a);
        assert_eq!(a, expected);
    }

    #[test]
    fn large_f64_input_matches_comparison_sort_with_negatives_and_zero() {
        let n = RADIX_SORT_THRESHOLD + 2000;
        let mut a: Vec<f64> = (0..n as i64).map(|i| ((i * 48271) % 100_000) as f64 / 10.0 - 5000.0).collect();
        a.push(0.0);
        a.push(-0.0);
        let mut expected = a.clone();
        expected.sort_by(|x, y| x.partial_cmp(y).unwrap());
        radix_sort_f64(&mut a);
        assert_eq!(a, expected);
    }
}
