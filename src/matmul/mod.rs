//! The matmul tile-kernel core: outer-product tile matmul, its K-last dot-product sibling,
//! transpose, and the blocked drivers tying tile-sized kernels to arbitrary matrix sizes.
//!
//! `matmul`/`matmul_klast`/`matmul_strided`/`transpose` are the one-entry-per-operation front
//! door (§6); `tile`, `klast`, `transpose` submodules hold the actual kernels for callers who
//! want to pick a specific one directly.

pub mod blocked;
pub mod elem;
pub mod klast;
pub mod tile;
pub mod transpose;

use crate::dispatch::{self, Op};
use crate::error::VqmatError;
use crate::LaneKind;
use elem::NarrowFloat;

/// `C = ATᵀ · B` for `f32` (§4.9). `AT` is `k×m` row-major, `B` is `k×n` row-major.
pub fn matmul_f32(at: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) -> Result<(), VqmatError> {
    dispatch::log_selection_once(Op::MatmulTile, LaneKind::F32, tile::tile_extent_f32());
    blocked::matmul_tile_f32(at, b, c, m, n, k)
}

/// `f64` counterpart of [`matmul_f32`].
pub fn matmul_f64(at: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) -> Result<(), VqmatError> {
    dispatch::log_selection_once(Op::MatmulTile, LaneKind::F64, tile::tile_extent_f64());
    blocked::matmul_tile_f64(at, b, c, m, n, k)
}

/// Widened-precision counterpart of [`matmul_f32`] for `half::f16`/`half::bf16`.
pub fn matmul_narrow<T: NarrowFloat>(at: &[T], b: &[T], c: &mut [T], m: usize, n: usize, k: usize) -> Result<(), VqmatError> {
    blocked::matmul_tile_narrow(at, b, c, m, n, k)
}

fn validate_klast_dims(m: usize, n: usize, k: usize, a_len: usize, b_len: usize, c_len: usize) -> Result<(), VqmatError> {
    if m == 0 || n == 0 || k == 0 {
        return Err(VqmatError::EmptyInput("matmul_klast: m, n, and k must all be nonzero"));
    }
    if a_len < m * k {
        return Err(VqmatError::BufferTooShort("matmul_klast: A shorter than m * k"));
    }
    if b_len < n * k {
        return Err(VqmatError::BufferTooShort("matmul_klast: B shorter than n * k"));
    }
    if c_len < m * n {
        return Err(VqmatError::BufferTooShort("matmul_klast: C shorter than m * n"));
    }
    Ok(())
}

/// `C = A·Bᵀ` for `f32` (§4.9 "K-last blocked"). `A` is `m×k` row-major, `B` is `n×k`
/// row-major — both operands' rows are contiguous dot-product operands, the layout a weight
/// matrix is usually already stored in.
pub fn matmul_klast_f32(a: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) -> Result<(), VqmatError> {
    validate_klast_dims(m, n, k, a.len(), b.len(), c.len())?;
    dispatch::log_selection_once(Op::MatmulKlast, LaneKind::F32, dispatch::lanes_32bit());
    klast::matmul_klast_f32(a, b, c, m, n, k);
    Ok(())
}

/// `f64` counterpart of [`matmul_klast_f32`].
pub fn matmul_klast_f64(a: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) -> Result<(), VqmatError> {
    validate_klast_dims(m, n, k, a.len(), b.len(), c.len())?;
    dispatch::log_selection_once(Op::MatmulKlast, LaneKind::F64, dispatch::lanes_64bit());
    klast::matmul_klast_f64(a, b, c, m, n, k);
    Ok(())
}

/// `matmul` writing into a column offset of a wider destination: `C[i, col_offset + j] =
/// (ATᵀ · B)[i, j]`, with `C`'s row stride `leading_dim_c` rather than `n`. Lets a caller tile
/// B's transposition and the matmul alternately, writing each B-tile's contribution straight
/// into its final place in a larger output.
///
/// Implemented by running the ordinary tile kernel into a compact `m×n` scratch and scattering
/// the result into the strided destination, rather than re-deriving a stride-parameterized
/// tile kernel; the scratch is a single allocation sized to the operation's own output, not
/// the caller's larger buffer.
pub fn matmul_strided_f32(
    at: &[f32],
    b: &[f32],
    c: &mut [f32],
    m: usize,
    n: usize,
    k: usize,
    leading_dim_c: usize,
    col_offset: usize,
) -> Result<(), VqmatError> {
    if leading_dim_c < col_offset + n {
        return Err(VqmatError::DimensionMismatch(
            "matmul_strided: leading_dim_c shorter than col_offset + n",
        ));
    }
    let mut scratch = vec![0.0f32; m * n];
    blocked::matmul_tile_f32(at, b, &mut scratch, m, n, k)?;
    for i in 0..m {
        let src_row = &scratch[i * n..i * n + n];
        let dst_start = i * leading_dim_c + col_offset;
        c[dst_start..dst_start + n].copy_from_slice(src_row);
    }
    Ok(())
}

/// `transpose(src, rows, cols, dst)`: `dst[j, i] = src[i, j]` (§4.8).
pub use transpose::transpose;
/// The row-strip variant of [`transpose`] for independent parallel transposition by a caller
/// partitioning rows.
pub use transpose::transpose_strided;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matmul_strided_writes_into_column_offset() {
        let (m, n, k) = (8, 8, 4);
        let at: Vec<f32> = (0..k * m).map(|i| (i as f32 * 0.2).sin()).collect();
        let b: Vec<f32> = (0..k * n).map(|i| (i as f32 * 0.3).cos()).collect();

        let mut c_plain = vec![0.0f32; m * n];
        matmul_f32(&at, &b, &mut c_plain, m, n, k).unwrap();

        let leading_dim_c = n + 5;
        let col_offset = 3;
        let mut c_wide = vec![-1.0f32; m * leading_dim_c];
        matmul_strided_f32(&at, &b, &mut c_wide, m, n, k, leading_dim_c, col_offset).unwrap();

        for i in 0..m {
            for j in 0..n {
                assert!((c_wide[i * leading_dim_c + col_offset + j] - c_plain[i * n + j]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn matmul_klast_rejects_dimension_mismatch() {
        let a = vec![0.0f32; 4];
        let b = vec![0.0f32; 4];
        let mut c = vec![0.0f32; 9];
        let err = matmul_klast_f32(&a, &b, &mut c, 3, 3, 3).unwrap_err();
        assert_eq!(err, VqmatError::BufferTooShort("matmul_klast: A shorter than m * k"));
    }
}
