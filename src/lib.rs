//! Vectorized quicksort / radix-sort and tiled outer-product matmul kernels.
//!
//! This crate is the "hard part" extracted from a portable SIMD numerics library: it does
//! not do code generation, feature probing below the [`capabilities`] module, or
//! packaging/benchmarking. It assumes a portable SIMD vocabulary is available (here, a thin
//! layer over [`core::simd`], see [`simd`]) and builds two independent cores on top of it:
//!
//! - [`sort`]: `vqsort`, `radix_sort`, `nth_element`, and the partition primitives they share.
//! - [`matmul`]: tiled outer-product matmul, transpose, and their blocked drivers.
//!
//! Both cores are single-threaded per call and allocate no more than a bounded, small amount
//! of scratch; see the module docs for the exact contracts. A small [`dispatch`] table picks
//! the strongest backend available for a given lane type at first use and is shared by both
//! cores.
#![feature(portable_simd)]
#![warn(missing_docs)]

pub mod accel;
pub mod capabilities;
pub mod dispatch;
pub mod error;
pub mod matmul;
pub mod simd;
pub mod sort;

pub use error::VqmatError;

/// Lane element types the crate operates on.
///
/// Sort operates on the four numeric kinds; matmul additionally accepts the two
/// half-precision kinds via [`half::f16`] and [`half::bf16`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LaneKind {
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `half::f16`
    F16,
    /// `half::bf16`
    Bf16,
}

impl core::fmt::Display for LaneKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            LaneKind::I32 => "i32",
            LaneKind::I64 => "i64",
            LaneKind::F32 => "f32",
            LaneKind::F64 => "f64",
            LaneKind::F16 => "f16",
            LaneKind::Bf16 => "bf16",
        };
        f.write_str(s)
    }
}
