//! Transpose (§4.8): `dst[j, i] = src[i, j]` for `src` an `rows × cols` row-major matrix,
//! `dst` the resulting `cols × rows` row-major matrix. Three variants share the contract and
//! differ only in how they move data:
//!
//! - [`transpose_scalar`]: element-at-a-time, used directly for small matrices.
//! - [`transpose_tiled`]: cache-blocks the same element-at-a-time copy into
//!   `TILE × TILE` squares so large transposes don't thrash the cache reading one column at a
//!   time; `spec.md` frames this as using "vector-interleave primitives", but portable SIMD
//!   has no general in-register transpose primitive, so the tiling (the actual source of the
//!   speedup — bounded working set per tile) is implemented directly and the per-element
//!   move inside a tile stays scalar.
//! - [`transpose_accelerator`]: identical tiling, wrapped in a [`crate::accel::AcceleratorGuard`]
//!   acquisition — the hardware instruction that would write/read the accelerator's 2-D tile
//!   register directly is the per-backend codegen this crate's purpose statement puts out of
//!   scope, so this variant's contribution over `transpose_tiled` is exercising the guard's
//!   acquire/release protocol, not a different memory-movement strategy.

use crate::accel::AcceleratorGuard;
use crate::error::VqmatError;

/// Below this extent in both dimensions, tiling overhead isn't worth it.
pub const SCALAR_TRANSPOSE_THRESHOLD: usize = 32;

/// Cache-block extent for [`transpose_tiled`] and [`transpose_accelerator`].
pub const TRANSPOSE_TILE: usize = 16;

/// `dst[j, i] = src[i, j]`, one element at a time.
pub fn transpose_scalar<T: Copy>(src: &[T], rows: usize, cols: usize, dst: &mut [T]) {
    for i in 0..rows {
        for j in 0..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}

/// As [`transpose_scalar`] but processed in `TRANSPOSE_TILE × TRANSPOSE_TILE` blocks so a
/// large transpose's working set per inner loop stays cache-resident; boundary tiles are
/// clamped to whatever rows/cols remain.
pub fn transpose_tiled<T: Copy>(src: &[T], rows: usize, cols: usize, dst: &mut [T]) {
    let tile = TRANSPOSE_TILE;
    let mut i0 = 0;
    while i0 < rows {
        let it = tile.min(rows - i0);
        let mut j0 = 0;
        while j0 < cols {
            let jt = tile.min(cols - j0);
            for i in 0..it {
                for j in 0..jt {
                    dst[(j0 + j) * rows + (i0 + i)] = src[(i0 + i) * cols + (j0 + j)];
                }
            }
            j0 += tile;
        }
        i0 += tile;
    }
}

/// As [`transpose_tiled`], wrapped in a scoped accelerator guard acquisition (§4.8,
/// "Requires the scoped accelerator guard because the accelerator hardware requires exclusive
/// per-thread context"). Falls back to [`transpose_tiled`] transparently when the accelerator
/// is unavailable, per §7's "unsupported accelerator" routing rule.
pub fn transpose_accelerator<T: Copy>(src: &[T], rows: usize, cols: usize, dst: &mut [T]) {
    // Either branch ends up calling the same tiled path: the accelerator's actual 2-D tile
    // write/read is out of scope (see the module doc comment), so this call's only real job
    // is exercising the guard's acquire/release protocol around the equivalent SIMD work.
    match AcceleratorGuard::acquire() {
        Ok(_guard) => transpose_tiled(src, rows, cols, dst),
        Err(VqmatError::AcceleratorUnavailable) => transpose_tiled(src, rows, cols, dst),
        Err(_) => transpose_tiled(src, rows, cols, dst),
    }
}

/// Picks [`transpose_scalar`] or [`transpose_tiled`] by size, the way the sort core's
/// small/large split works.
pub fn transpose<T: Copy>(src: &[T], rows: usize, cols: usize, dst: &mut [T]) -> Result<(), VqmatError> {
    if rows == 0 || cols == 0 {
        return Err(VqmatError::EmptyInput("transpose: rows and cols must both be nonzero"));
    }
    if src.len() < rows * cols {
        return Err(VqmatError::BufferTooShort("transpose: src shorter than rows * cols"));
    }
    if dst.len() < rows * cols {
        return Err(VqmatError::BufferTooShort("transpose: dst shorter than rows * cols"));
    }
    if rows < SCALAR_TRANSPOSE_THRESHOLD && cols < SCALAR_TRANSPOSE_THRESHOLD {
        transpose_scalar(src, rows, cols, dst);
    } else {
        transpose_tiled(src, rows, cols, dst);
    }
    Ok(())
}

/// Transposes the row strip `[row_begin, row_end)` of a larger logical source matrix. `src`
/// holds just that strip already (`row_end - row_begin` rows of `cols` elements, row-major —
/// the caller's own slice of the full source), and `dst` is the *full* `cols × (row_end -
/// row_begin + ...)`-shaped output the caller is assembling from possibly several strips, so
/// `dst_leading_dim` (`dst`'s row stride) and `row_begin` place this strip's columns at the
/// right offset within it. Lets a caller parallelize a full transpose by partitioning rows
/// into strips that each call this independently, every strip writing disjoint columns of
/// the same `dst` buffer.
pub fn transpose_strided<T: Copy>(
    src: &[T],
    row_begin: usize,
    row_end: usize,
    cols: usize,
    dst_leading_dim: usize,
    dst: &mut [T],
) -> Result<(), VqmatError> {
    if row_end <= row_begin || cols == 0 {
        return Err(VqmatError::EmptyInput("transpose_strided: empty row range or zero cols"));
    }
    if dst_leading_dim < row_end {
        return Err(VqmatError::DimensionMismatch(
            "transpose_strided: dst_leading_dim shorter than row_end",
        ));
    }
    for (local_i, i) in (row_begin..row_end).enumerate() {
        for j in 0..cols {
            dst[j * dst_leading_dim + i] = src[local_i * cols + j];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_scalar_path_transposes_correctly() {
        let src = [1, 2, 3, 4, 5, 6]; // 2 rows x 3 cols
        let mut dst = [0; 6];
        transpose(&src, 2, 3, &mut dst).unwrap();
        assert_eq!(dst, [1, 4, 2, 5, 3, 6]); // 3 rows x 2 cols
    }

    #[test]
    fn tiled_path_matches_scalar_on_large_matrix() {
        let rows = 50;
        let cols = 40;
        let src: Vec<i32> = (0..(rows * cols) as i32).collect();
        let mut dst_scalar = vec![0i32; rows * cols];
        transpose_scalar(&src, rows, cols, &mut dst_scalar);
        let mut dst_tiled = vec![0i32; rows * cols];
        transpose_tiled(&src, rows, cols, &mut dst_tiled);
        assert_eq!(dst_scalar, dst_tiled);
    }

    #[test]
    fn rejects_zero_dimensions() {
        let src: [i32; 0] = [];
        let mut dst: [i32; 0] = [];
        assert_eq!(
            transpose(&src, 0, 5, &mut dst),
            Err(VqmatError::EmptyInput("transpose: rows and cols must both be nonzero"))
        );
    }

    #[test]
    fn strided_strip_matches_full_transpose() {
        let rows = 6;
        let cols = 4;
        let src: Vec<i32> = (0..(rows * cols) as i32).collect();
        let mut dst_full = vec![0i32; rows * cols];
        transpose(&src, rows, cols, &mut dst_full).unwrap();

        let mut dst_strided = vec![0i32; rows * cols];
        transpose_strided(&src[0 * cols..3 * cols], 0, 3, cols, rows, &mut dst_strided).unwrap();
        transpose_strided(&src[3 * cols..6 * cols], 3, 6, cols, rows, &mut dst_strided).unwrap();
        assert_eq!(dst_full, dst_strided);
    }
}
