//! SIMD 2-way partition via compress + double-store (§4.4). This is Highway's VQSort
//! partition primitive, exposed here as a standalone primitive in its own right rather than
//! wired into the introsort driver in `introsort.rs` (which recurses generically over
//! [`super::partition3::Partition3`] for every lane type, including `f32`) — see
//! `DESIGN.md`'s Open Questions for why. It's the hardest-to-get-right piece of the sort
//! core: every iteration
//! writes a freshly compressed vector to *both* the left write cursor and the right write
//! cursor, relying on the "read strictly ahead of write" invariant (guaranteed by preloading
//! `P` elements from each end before the main loop starts) so that whichever side's store
//! turns out to be garbage gets overwritten before anything reads it.
//!
//! Unlike the general-purpose [`crate::simd::compress`] (whose tail lanes are documented as
//! unspecified), this module needs — and defines locally as `compress_stable` — the full
//! *stable* in-register partition: selected ("lt") lanes first in original order, followed by
//! the non-selected ("ge") lanes in original order. The double-store trick depends on that
//! concrete tail behavior, not just the "selected lanes first" half of the contract; see the
//! design notes' call to "encode the read-ahead-of-write protocol as a small state machine"
//! and "implementers should assert it" — the `debug_assert!(remaining >= lanes)` calls below
//! are that assertion.

use super::lane::SortLane;
use crate::simd::{self, VectorLane};
use std::simd::{LaneCount, SupportedLaneCount};

/// Unroll factor for the preload at each end of the array.
const UNROLL: usize = 4;

/// Splits `arr` into (selected-first, original order) ++ (non-selected, original order);
/// the local realization of [`crate::simd::compress`]'s full permutation that `partition2`
/// depends on. Returns the compacted array and `k`, the number of selected ("lt") lanes.
fn compress_stable<T: Copy + Default, const N: usize>(arr: [T; N], mask: [bool; N]) -> ([T; N], usize) {
    let mut out = [T::default(); N];
    let mut ge_tmp = [T::default(); N];
    let mut front = 0;
    let mut back = 0;
    for i in 0..N {
        if mask[i] {
            out[front] = arr[i];
            front += 1;
        } else {
            ge_tmp[back] = arr[i];
            back += 1;
        }
    }
    out[front..front + back].copy_from_slice(&ge_tmp[..back]);
    (out, front)
}

/// One "classify, compress, double-store" step. Loads nothing itself — takes the already
/// loaded `N`-lane block `arr` — and performs the store-pair against `a`, advancing
/// `write_l`/`remaining` by the protocol §4.4 describes.
#[inline(always)]
fn store_left_right<T: SortLane, const N: usize>(
    a: &mut [T],
    arr: [T; N],
    pivot: &T,
    write_l: &mut usize,
    remaining: &mut usize,
) {
    debug_assert!(*remaining >= N, "double-store would read unwritten data");
    let mask: [bool; N] = core::array::from_fn(|i| arr[i].lt(pivot));
    let (compressed, k) = compress_stable(arr, mask);
    *remaining -= N;
    a[*write_l..*write_l + N].copy_from_slice(&compressed);
    let right = *remaining + *write_l;
    a[right..right + N].copy_from_slice(&compressed);
    *write_l += k;
}

fn scalar_partition2<T: SortLane>(a: &mut [T], pivot: &T) -> usize {
    let mut lo = 0;
    let mut hi = a.len();
    while lo < hi {
        if a[lo].lt(pivot) {
            lo += 1;
        } else {
            hi -= 1;
            a.swap(lo, hi);
        }
    }
    lo
}

/// The SIMD-width-monomorphized 2-way partition.
pub fn partition2_with_width<T, const N: usize>(a: &mut [T], pivot: T) -> usize
where
    T: SortLane + VectorLane<N>,
    LaneCount<N>: SupportedLaneCount,
{
    let n = a.len();
    let preload = UNROLL * N;

    if N < 2 || n < 2 * preload || (n - 2 * preload) % N != 0 {
        return scalar_partition2(a, &pivot);
    }

    let mut vl: [[T; N]; UNROLL] = core::array::from_fn(|j| {
        let mut buf = [T::default(); N];
        buf.copy_from_slice(&a[j * N..(j + 1) * N]);
        buf
    });
    let mut vr: [[T; N]; UNROLL] = core::array::from_fn(|j| {
        let mut buf = [T::default(); N];
        buf.copy_from_slice(&a[n - preload + j * N..n - preload + (j + 1) * N]);
        buf
    });

    let mut read_l = preload;
    let mut read_r = n - preload;
    let mut write_l = 0usize;
    let mut remaining = n;

    while read_l < read_r {
        let capacity_l = read_l - write_l;
        let block: [T; N] = if capacity_l > preload {
            read_r -= N;
            let mut buf = [T::default(); N];
            buf.copy_from_slice(&a[read_r..read_r + N]);
            buf
        } else {
            let mut buf = [T::default(); N];
            buf.copy_from_slice(&a[read_l..read_l + N]);
            read_l += N;
            buf
        };
        store_left_right(a, block, &pivot, &mut write_l, &mut remaining);
    }

    // Drain the preloaded lefts...
    for block in vl {
        store_left_right(a, block, &pivot, &mut write_l, &mut remaining);
    }
    // ...and all but the last two preloaded rights, the same way.
    for block in vr.iter().take(UNROLL - 2).copied() {
        store_left_right(a, block, &pivot, &mut write_l, &mut remaining);
    }

    // The last two preloaded rights can't safely double-store: there is no more "read ahead
    // of write" slack left. Compress each into a small stack buffer instead; selected ("lt")
    // lanes accumulate in the buffer as future lefts, the rest go directly to a shrinking
    // right-write cursor.
    let mut buf = [T::default(); 2 * N];
    let mut buf_count = 0usize;
    let mut write_r = write_l + remaining;
    for block in vr.iter().skip(UNROLL - 2).copied() {
        let mask: [bool; N] = core::array::from_fn(|i| block[i].lt(&pivot));
        let (compressed, k) = compress_stable(block, mask);
        buf[buf_count..buf_count + k].copy_from_slice(&compressed[..k]);
        buf_count += k;
        let ge_count = N - k;
        write_r -= ge_count;
        a[write_r..write_r + ge_count].copy_from_slice(&compressed[k..N]);
    }
    debug_assert_eq!(write_r, write_l + buf_count);

    a[write_l..write_l + buf_count].copy_from_slice(&buf[..buf_count]);
    write_l + buf_count
}

/// `partition2` for `i32`.
pub fn partition2_i32(a: &mut [i32], pivot: i32) -> usize {
    crate::dispatch::log_selection_once(
        crate::dispatch::Op::Partition2,
        crate::LaneKind::I32,
        crate::dispatch::lanes_32bit(),
    );
    match crate::dispatch::lanes_32bit() {
        16 => partition2_with_width::<i32, 16>(a, pivot),
        8 => partition2_with_width::<i32, 8>(a, pivot),
        _ => partition2_with_width::<i32, 4>(a, pivot),
    }
}

/// `partition2` for `i64`.
pub fn partition2_i64(a: &mut [i64], pivot: i64) -> usize {
    crate::dispatch::log_selection_once(
        crate::dispatch::Op::Partition2,
        crate::LaneKind::I64,
        crate::dispatch::lanes_64bit(),
    );
    match crate::dispatch::lanes_64bit() {
        8 => partition2_with_width::<i64, 8>(a, pivot),
        4 => partition2_with_width::<i64, 4>(a, pivot),
        _ => partition2_with_width::<i64, 2>(a, pivot),
    }
}

/// `partition2` for `f32`. Available for callers who want a pure 2-way split directly (§4.4
/// calls this out as the driver's float32 fast path; this crate's own driver recurses
/// uniformly via [`super::partition3::Partition3`] across all four lane types instead, see
/// `DESIGN.md`).
pub fn partition2_f32(a: &mut [f32], pivot: f32) -> usize {
    crate::dispatch::log_selection_once(
        crate::dispatch::Op::Partition2,
        crate::LaneKind::F32,
        crate::dispatch::lanes_32bit(),
    );
    match crate::dispatch::lanes_32bit() {
        16 => partition2_with_width::<f32, 16>(a, pivot),
        8 => partition2_with_width::<f32, 8>(a, pivot),
        _ => partition2_with_width::<f32, 4>(a, pivot),
    }
}

/// `partition2` for `f64`.
pub fn partition2_f64(a: &mut [f64], pivot: f64) -> usize {
    crate::dispatch::log_selection_once(
        crate::dispatch::Op::Partition2,
        crate::LaneKind::F64,
        crate::dispatch::lanes_64bit(),
    );
    match crate::dispatch::lanes_64bit() {
        8 => partition2_with_width::<f64, 8>(a, pivot),
        4 => partition2_with_width::<f64, 4>(a, pivot),
        _ => partition2_with_width::<f64, 2>(a, pivot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(a: &[i32], idx: usize, pivot: i32) {
        assert!(a[..idx].iter().all(|&x| x < pivot));
        assert!(a[idx..].iter().all(|&x| x >= pivot));
    }

    #[test]
    fn scalar_fallback_on_small_input() {
        let mut a = vec![5, 2, 8, 1, 9, 3];
        let mut expected = a.clone();
        expected.sort();
        let idx = partition2_i32(&mut a, 5);
        check(&a, idx, 5);
        let mut got = a.clone();
        got.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn large_input_exercises_simd_fast_path() {
        let n = 20_000;
        let mut a: Vec<i32> = (0..n).map(|i| (i * 2654435761u32 as i64 % 10_000) as i32).collect();
        let mut expected = a.clone();
        expected.sort();
        let pivot = 5000;
        let idx = partition2_i32(&mut a, pivot);
        check(&a, idx, pivot);
        let mut got = a.clone();
        got.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn all_less_than_pivot() {
        let mut a = vec![1i32; 5000];
        let idx = partition2_i32(&mut a, 10);
        assert_eq!(idx, 5000);
    }

    #[test]
    fn all_greater_equal_pivot() {
        let mut a = vec![10i32; 5000];
        let idx = partition2_i32(&mut a, 1);
        assert_eq!(idx, 0);
    }

    #[test]
    fn works_for_f32_fast_path() {
        let n = 8192;
        let mut a: Vec<f32> = (0..n).map(|i| ((i * 7919) % 4000) as f32 - 2000.0).collect();
        let mut expected = a.clone();
        expected.sort_by(|x, y| x.partial_cmp(y).unwrap());
        let idx = partition2_f32(&mut a, 0.0);
        check_f32(&a, idx, 0.0);
        let mut got = a.clone();
        got.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_eq!(got, expected);
    }

    fn check_f32(a: &[f32], idx: usize, pivot: f32) {
        assert!(a[..idx].iter().all(|&x| x < pivot));
        assert!(a[idx..].iter().all(|&x| x >= pivot));
    }
}
