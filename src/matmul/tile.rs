//! The outer-product tile kernel (§4.9): `matmul_tile(AT, B, C, m, n, k)` computes
//! `C = ATᵀ · B` where `AT` is `k×m` row-major (so its rows are contiguous slices of what
//! would be A's columns) and `B` is `k×n` row-major.
//!
//! The real hardware this is modeled on issues one `FMOPA`/`BFMOPA` instruction per `p` step
//! that accumulates an entire `M_T × N_T` outer product into a 2-D tile register in one shot;
//! that instruction and its register file are the "per-backend code generation" this crate's
//! purpose statement puts out of scope. What's implemented here is the portable stand-in: the
//! same tile grid and accumulation order, built from a broadcast-multiply-add per row so the
//! kernel is correct and vectorizable without committing to any one ISA's tile extension.

use super::elem::{narrow_into, widen_into, NarrowFloat};
use crate::dispatch;
use std::simd::{LaneCount, Simd, SupportedLaneCount};

/// Zeroes the `N×N` accumulator, then for each of the `k` reduction steps loads an `N`-lane
/// slice of `AT`'s row `p` (the tile's rows) and of `B`'s row `p` (the tile's columns) and
/// accumulates their outer product; stores the tile to `C` once `k` steps are done.
pub fn tile_kernel_f32<const N: usize>(at: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize, i0: usize, j0: usize)
where
    LaneCount<N>: SupportedLaneCount,
{
    let mut acc = [Simd::<f32, N>::splat(0.0); N];
    for p in 0..k {
        let a_row = &at[p * m + i0..p * m + i0 + N];
        let b_vec = Simd::<f32, N>::from_slice(&b[p * n + j0..p * n + j0 + N]);
        for (i, &a_val) in a_row.iter().enumerate() {
            acc[i] += Simd::<f32, N>::splat(a_val) * b_vec;
        }
    }
    for (i, row) in acc.iter().enumerate() {
        c[(i0 + i) * n + j0..(i0 + i) * n + j0 + N].copy_from_slice(&row.to_array());
    }
}

/// The 2×2 multi-tile fused kernel (§4.9 "four independent accumulator tiles ZA0..ZA3"):
/// covers a `2N × 2N` block per call, loading each row of `AT`/`B` once and feeding all four
/// accumulators from it instead of calling [`tile_kernel_f32`] four times over.
pub fn tile4_kernel_f32<const N: usize>(at: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize, i0: usize, j0: usize)
where
    LaneCount<N>: SupportedLaneCount,
{
    let mut za0 = [Simd::<f32, N>::splat(0.0); N];
    let mut za1 = [Simd::<f32, N>::splat(0.0); N];
    let mut za2 = [Simd::<f32, N>::splat(0.0); N];
    let mut za3 = [Simd::<f32, N>::splat(0.0); N];
    for p in 0..k {
        let a0 = &at[p * m + i0..p * m + i0 + N];
        let a1 = &at[p * m + i0 + N..p * m + i0 + 2 * N];
        let b0 = Simd::<f32, N>::from_slice(&b[p * n + j0..p * n + j0 + N]);
        let b1 = Simd::<f32, N>::from_slice(&b[p * n + j0 + N..p * n + j0 + 2 * N]);
        for i in 0..N {
            let av0 = Simd::<f32, N>::splat(a0[i]);
            za0[i] += av0 * b0;
            za1[i] += av0 * b1;
        }
        for i in 0..N {
            let av1 = Simd::<f32, N>::splat(a1[i]);
            za2[i] += av1 * b0;
            za3[i] += av1 * b1;
        }
    }
    for i in 0..N {
        c[(i0 + i) * n + j0..(i0 + i) * n + j0 + N].copy_from_slice(&za0[i].to_array());
        c[(i0 + i) * n + j0 + N..(i0 + i) * n + j0 + 2 * N].copy_from_slice(&za1[i].to_array());
        c[(i0 + i + N) * n + j0..(i0 + i + N) * n + j0 + N].copy_from_slice(&za2[i].to_array());
        c[(i0 + i + N) * n + j0 + N..(i0 + i + N) * n + j0 + 2 * N].copy_from_slice(&za3[i].to_array());
    }
}

/// Fully scalar single-tile kernel for boundary tiles narrower/shorter than the vector width.
pub fn tile_kernel_scalar_f32(at: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize, i0: usize, j0: usize, mt: usize, nt: usize) {
    for i in 0..mt {
        for j in 0..nt {
            let mut acc = 0.0f32;
            for p in 0..k {
                acc += at[p * m + i0 + i] * b[p * n + j0 + j];
            }
            c[(i0 + i) * n + j0 + j] = acc;
        }
    }
}

/// `f64` counterpart of [`tile_kernel_f32`].
pub fn tile_kernel_f64<const N: usize>(at: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize, i0: usize, j0: usize)
where
    LaneCount<N>: SupportedLaneCount,
{
    let mut acc = [Simd::<f64, N>::splat(0.0); N];
    for p in 0..k {
        let a_row = &at[p * m + i0..p * m + i0 + N];
        let b_vec = Simd::<f64, N>::from_slice(&b[p * n + j0..p * n + j0 + N]);
        for (i, &a_val) in a_row.iter().enumerate() {
            acc[i] += Simd::<f64, N>::splat(a_val) * b_vec;
        }
    }
    for (i, row) in acc.iter().enumerate() {
        c[(i0 + i) * n + j0..(i0 + i) * n + j0 + N].copy_from_slice(&row.to_array());
    }
}

/// `f64` counterpart of [`tile_kernel_scalar_f32`].
pub fn tile_kernel_scalar_f64(at: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize, i0: usize, j0: usize, mt: usize, nt: usize) {
    for i in 0..mt {
        for j in 0..nt {
            let mut acc = 0.0f64;
            for p in 0..k {
                acc += at[p * m + i0 + i] * b[p * n + j0 + j];
            }
            c[(i0 + i) * n + j0 + j] = acc;
        }
    }
}

/// Widened-precision counterpart of [`tile_kernel_f32`] for any [`NarrowFloat`] lane type
/// (`half::f16`/`half::bf16`). The accumulator is `N×N` `f32` regardless of `T`, matching the
/// real hardware's "accumulate at full precision, pack down on store" contract; the only
/// scratch this needs beyond that stack-resident accumulator is one `N`-element `f32` row at a
/// time (via [`widen_into`]/[`narrow_into`]), never anything sized to the whole matrix.
pub fn tile_kernel_narrow<T: NarrowFloat, const N: usize>(at: &[T], b: &[T], c: &mut [T], m: usize, n: usize, k: usize, i0: usize, j0: usize) {
    let mut acc = [[0.0f32; N]; N];
    let mut b_row = [0.0f32; N];
    for p in 0..k {
        let a_row = &at[p * m + i0..p * m + i0 + N];
        widen_into(&b[p * n + j0..p * n + j0 + N], &mut b_row);
        for (i, a_elem) in a_row.iter().enumerate() {
            let a_val = a_elem.to_f32();
            for j in 0..N {
                acc[i][j] += a_val * b_row[j];
            }
        }
    }
    let mut c_row = [T::default(); N];
    for (i, row) in acc.iter().enumerate() {
        narrow_into(row, &mut c_row);
        c[(i0 + i) * n + j0..(i0 + i) * n + j0 + N].copy_from_slice(&c_row);
    }
}

/// Fully scalar single-tile kernel for boundary tiles, the [`NarrowFloat`] counterpart of
/// [`tile_kernel_scalar_f32`]: widens each operand on use rather than through a shared buffer,
/// since a boundary tile is already at most `N×N` elements.
pub fn tile_kernel_scalar_narrow<T: NarrowFloat>(at: &[T], b: &[T], c: &mut [T], m: usize, n: usize, k: usize, i0: usize, j0: usize, mt: usize, nt: usize) {
    for i in 0..mt {
        for j in 0..nt {
            let mut acc = 0.0f32;
            for p in 0..k {
                acc += at[p * m + i0 + i].to_f32() * b[p * n + j0 + j].to_f32();
            }
            c[(i0 + i) * n + j0 + j] = T::from_f32(acc);
        }
    }
}

/// Dispatches [`tile_kernel_f32`] at the vector width [`dispatch::lanes_32bit`] selected for
/// 32-bit lanes.
pub fn tile_kernel_f32_dispatch(at: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize, i0: usize, j0: usize) {
    match dispatch::lanes_32bit() {
        16 => tile_kernel_f32::<16>(at, b, c, m, n, k, i0, j0),
        8 => tile_kernel_f32::<8>(at, b, c, m, n, k, i0, j0),
        _ => tile_kernel_f32::<4>(at, b, c, m, n, k, i0, j0),
    }
}

/// Dispatches [`tile4_kernel_f32`] the same way.
pub fn tile4_kernel_f32_dispatch(at: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize, i0: usize, j0: usize) {
    match dispatch::lanes_32bit() {
        16 => tile4_kernel_f32::<16>(at, b, c, m, n, k, i0, j0),
        8 => tile4_kernel_f32::<8>(at, b, c, m, n, k, i0, j0),
        _ => tile4_kernel_f32::<4>(at, b, c, m, n, k, i0, j0),
    }
}

/// Dispatches [`tile_kernel_f64`] at [`dispatch::lanes_64bit`].
pub fn tile_kernel_f64_dispatch(at: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize, i0: usize, j0: usize) {
    match dispatch::lanes_64bit() {
        8 => tile_kernel_f64::<8>(at, b, c, m, n, k, i0, j0),
        4 => tile_kernel_f64::<4>(at, b, c, m, n, k, i0, j0),
        _ => tile_kernel_f64::<2>(at, b, c, m, n, k, i0, j0),
    }
}

/// Dispatches [`tile_kernel_narrow`] at the vector width [`dispatch::lanes_32bit`] selected for
/// 32-bit lanes, same as the other narrow-float-sized (f16/bf16 widen to f32) kernels.
pub fn tile_kernel_narrow_dispatch<T: NarrowFloat>(at: &[T], b: &[T], c: &mut [T], m: usize, n: usize, k: usize, i0: usize, j0: usize) {
    match dispatch::lanes_32bit() {
        16 => tile_kernel_narrow::<T, 16>(at, b, c, m, n, k, i0, j0),
        8 => tile_kernel_narrow::<T, 8>(at, b, c, m, n, k, i0, j0),
        _ => tile_kernel_narrow::<T, 4>(at, b, c, m, n, k, i0, j0),
    }
}

/// Tile extent (in elements) [`tile_kernel_f32_dispatch`] will use for the current backend;
/// the blocked driver needs this to lay out its grid before calling down.
pub fn tile_extent_f32() -> usize {
    dispatch::lanes_32bit()
}

/// As [`tile_extent_f32`] for `f64`.
pub fn tile_extent_f64() -> usize {
    dispatch::lanes_64bit()
}

/// As [`tile_extent_f32`] for any [`NarrowFloat`] lane type.
pub fn tile_extent_narrow() -> usize {
    dispatch::lanes_32bit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_tile_identity_times_b_is_b() {
        let n = tile_extent_f32();
        let k = n;
        let m = n;
        // AT = I (k x m identity), so AT^T * B = B.
        let mut at = vec![0.0f32; k * m];
        for i in 0..n {
            at[i * m + i] = 1.0;
        }
        let b: Vec<f32> = (0..k * n).map(|i| i as f32).collect();
        let mut c = vec![0.0f32; m * n];
        tile_kernel_f32_dispatch(&at, &b, &mut c, m, n, k, 0, 0);
        assert_eq!(c, b);
    }

    #[test]
    fn four_tile_fused_matches_four_single_tile_calls() {
        let tile = tile_extent_f32();
        let n2 = 2 * tile;
        let m2 = 2 * tile;
        let k = tile;
        let at: Vec<f32> = (0..k * m2).map(|i| ((i * 7 + 3) % 11) as f32).collect();
        let b: Vec<f32> = (0..k * n2).map(|i| ((i * 5 + 1) % 13) as f32).collect();

        let mut c_fused = vec![0.0f32; m2 * n2];
        tile4_kernel_f32_dispatch(&at, &b, &mut c_fused, m2, n2, k, 0, 0);

        let mut c_single = vec![0.0f32; m2 * n2];
        tile_kernel_f32_dispatch(&at, &b, &mut c_single, m2, n2, k, 0, 0);
        tile_kernel_f32_dispatch(&at, &b, &mut c_single, m2, n2, k, 0, tile);
        tile_kernel_f32_dispatch(&at, &b, &mut c_single, m2, n2, k, tile, 0);
        tile_kernel_f32_dispatch(&at, &b, &mut c_single, m2, n2, k, tile, tile);

        assert_eq!(c_fused, c_single);
    }

    #[test]
    fn narrow_tile_identity_times_b_is_b() {
        let n = tile_extent_narrow();
        let k = n;
        let m = n;
        let mut at = vec![half::f16::from_f32(0.0); k * m];
        for i in 0..n {
            at[i * m + i] = half::f16::from_f32(1.0);
        }
        let b: Vec<half::f16> = (0..k * n).map(|i| half::f16::from_f32((i % 13) as f32 - 6.0)).collect();
        let mut c = vec![half::f16::from_f32(0.0); m * n];
        tile_kernel_narrow_dispatch(&at, &b, &mut c, m, n, k, 0, 0);
        for (got, want) in c.iter().zip(b.iter()) {
            assert!((got.to_f32() - want.to_f32()).abs() <= 1e-2);
        }
    }

    #[test]
    fn scalar_narrow_tile_matches_naive_triple_loop() {
        let (m, n, k) = (3, 3, 4);
        let at: Vec<half::bf16> = (0..k * m).map(|i| half::bf16::from_f32(i as f32 * 0.5)).collect();
        let b: Vec<half::bf16> = (0..k * n).map(|i| half::bf16::from_f32(i as f32 * 0.25)).collect();
        let mut c = vec![half::bf16::from_f32(0.0); m * n];
        tile_kernel_scalar_narrow(&at, &b, &mut c, m, n, k, 0, 0, m, n);
        for i in 0..m {
            for j in 0..n {
                let mut expected = 0.0f32;
                for p in 0..k {
                    expected += at[p * m + i].to_f32() * b[p * n + j].to_f32();
                }
                assert!((c[i * n + j].to_f32() - expected).abs() < 0.5);
            }
        }
    }

    #[test]
    fn scalar_tile_matches_naive_triple_loop() {
        let m = 3;
        let n = 3;
        let k = 4;
        let at: Vec<f32> = (0..k * m).map(|i| i as f32 * 0.5).collect();
        let b: Vec<f32> = (0..k * n).map(|i| i as f32 * 0.25).collect();
        let mut c = vec![0.0f32; m * n];
        tile_kernel_scalar_f32(&at, &b, &mut c, m, n, k, 0, 0, m, n);
        for i in 0..m {
            for j in 0..n {
                let mut expected = 0.0f32;
                for p in 0..k {
                    expected += at[p * m + i] * b[p * n + j];
                }
                assert!((c[i * n + j] - expected).abs() < 1e-6);
            }
        }
    }
}
