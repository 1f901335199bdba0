//! The K-last layout (§4.9 "B held as Nᵀ for weight-style layouts"): `matmul_klast(A, B, C,
//! m, n, k)` computes `C = A·Bᵀ` with `A` row-major `m×k` and `B` row-major `n×k` — i.e. both
//! operands' rows are contiguous `k`-length dot-product operands, which is how a weight
//! matrix is usually stored already. This avoids the transpose the outer-product form in
//! [`super::tile`] would otherwise need, at the cost of expressing the kernel as a tiled
//! dot-product with horizontal reduction instead of an outer product.

use std::simd::{LaneCount, Simd, SupportedLaneCount};

/// Row tile extent for the 4×4 (f32) / 2×2 (f64) dot-product inner kernel: sized to amortize
/// reloading `A`'s row across several `B` rows (and vice versa), not tied to the vector width.
pub const ROW_TILE_F32: usize = 4;
/// As [`ROW_TILE_F32`] for `f64`.
pub const ROW_TILE_F64: usize = 2;

fn dot_f32_width<const N: usize>(x: &[f32], y: &[f32]) -> f32
where
    LaneCount<N>: SupportedLaneCount,
{
    let mut acc = Simd::<f32, N>::splat(0.0);
    let chunks = x.len() / N;
    for c in 0..chunks {
        let xv = Simd::<f32, N>::from_slice(&x[c * N..c * N + N]);
        let yv = Simd::<f32, N>::from_slice(&y[c * N..c * N + N]);
        acc += xv * yv;
    }
    let mut sum = acc.reduce_sum();
    for i in chunks * N..x.len() {
        sum += x[i] * y[i];
    }
    sum
}

/// SIMD dot product with horizontal reduction, dispatched at [`crate::dispatch::lanes_32bit`].
pub fn dot_f32(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    match crate::dispatch::lanes_32bit() {
        16 => dot_f32_width::<16>(x, y),
        8 => dot_f32_width::<8>(x, y),
        _ => dot_f32_width::<4>(x, y),
    }
}

fn dot_f64_width<const N: usize>(x: &[f64], y: &[f64]) -> f64
where
    LaneCount<N>: SupportedLaneCount,
{
    let mut acc = Simd::<f64, N>::splat(0.0);
    let chunks = x.len() / N;
    for c in 0..chunks {
        let xv = Simd::<f64, N>::from_slice(&x[c * N..c * N + N]);
        let yv = Simd::<f64, N>::from_slice(&y[c * N..c * N + N]);
        acc += xv * yv;
    }
    let mut sum = acc.reduce_sum();
    for i in chunks * N..x.len() {
        sum += x[i] * y[i];
    }
    sum
}

/// As [`dot_f32`] for `f64`.
pub fn dot_f64(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    match crate::dispatch::lanes_64bit() {
        8 => dot_f64_width::<8>(x, y),
        4 => dot_f64_width::<4>(x, y),
        _ => dot_f64_width::<2>(x, y),
    }
}

/// `C = A·Bᵀ`. `a` is `m×k` row-major, `b` is `n×k` row-major, `c` is `m×n` row-major; all
/// three are assumed pre-validated by the caller (`super::matmul_klast`).
///
/// When `m`/`n` are multiples of the row tile, the aligned path below skips the per-tile
/// boundary clamp; otherwise every tile's row/col extent is clamped to what's left.
pub fn matmul_klast_f32(a: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) {
    let tile = ROW_TILE_F32;
    if m % tile == 0 && n % tile == 0 {
        for i0 in (0..m).step_by(tile) {
            for j0 in (0..n).step_by(tile) {
                for i in 0..tile {
                    let row_a = &a[(i0 + i) * k..(i0 + i) * k + k];
                    for j in 0..tile {
                        let row_b = &b[(j0 + j) * k..(j0 + j) * k + k];
                        c[(i0 + i) * n + j0 + j] = dot_f32(row_a, row_b);
                    }
                }
            }
        }
        return;
    }
    for i0 in (0..m).step_by(tile) {
        let mt = tile.min(m - i0);
        for j0 in (0..n).step_by(tile) {
            let nt = tile.min(n - j0);
            for i in 0..mt {
                let row_a = &a[(i0 + i) * k..(i0 + i) * k + k];
                for j in 0..nt {
                    let row_b = &b[(j0 + j) * k..(j0 + j) * k + k];
                    c[(i0 + i) * n + j0 + j] = dot_f32(row_a, row_b);
                }
            }
        }
    }
}

/// `f64` counterpart of [`matmul_klast_f32`].
pub fn matmul_klast_f64(a: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) {
    let tile = ROW_TILE_F64;
    if m % tile == 0 && n % tile == 0 {
        for i0 in (0..m).step_by(tile) {
            for j0 in (0..n).step_by(tile) {
                for i in 0..tile {
                    let row_a = &a[(i0 + i) * k..(i0 + i) * k + k];
                    for j in 0..tile {
                        let row_b = &b[(j0 + j) * k..(j0 + j) * k + k];
                        c[(i0 + i) * n + j0 + j] = dot_f64(row_a, row_b);
                    }
                }
            }
        }
        return;
    }
    for i0 in (0..m).step_by(tile) {
        let mt = tile.min(m - i0);
        for j0 in (0..n).step_by(tile) {
            let nt = tile.min(n - j0);
            for i in 0..mt {
                let row_a = &a[(i0 + i) * k..(i0 + i) * k + k];
                for j in 0..nt {
                    let row_b = &b[(j0 + j) * k..(j0 + j) * k + k];
                    c[(i0 + i) * n + j0 + j] = dot_f64(row_a, row_b);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_klast(a: &[f32], b: &[f32], m: usize, n: usize, k: usize) -> Vec<f32> {
        let mut c = vec![0.0f32; m * n];
        for i in 0..m {
            for j in 0..n {
                let mut acc = 0.0;
                for p in 0..k {
                    acc += a[i * k + p] * b[j * k + p];
                }
                c[i * n + j] = acc;
            }
        }
        c
    }

    #[test]
    fn matches_naive_aligned_dims() {
        let (m, n, k) = (8, 8, 6);
        let a: Vec<f32> = (0..m * k).map(|i| (i as f32 * 0.3).sin()).collect();
        let b: Vec<f32> = (0..n * k).map(|i| (i as f32 * 0.7).cos()).collect();
        let mut c = vec![0.0f32; m * n];
        matmul_klast_f32(&a, &b, &mut c, m, n, k);
        let expected = naive_klast(&a, &b, m, n, k);
        for (got, want) in c.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-4);
        }
    }

    #[test]
    fn matches_naive_unaligned_dims() {
        let (m, n, k) = (7, 5, 9);
        let a: Vec<f32> = (0..m * k).map(|i| (i as f32 * 0.3).sin()).collect();
        let b: Vec<f32> = (0..n * k).map(|i| (i as f32 * 0.7).cos()).collect();
        let mut c = vec![0.0f32; m * n];
        matmul_klast_f32(&a, &b, &mut c, m, n, k);
        let expected = naive_klast(&a, &b, m, n, k);
        for (got, want) in c.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-4);
        }
    }
}
