//! The portable SIMD vocabulary the rest of the crate is written against.
//!
//! Per `spec.md` §1 the actual SIMD primitive set (load/store/compress/broadcast/compare
//! masks/count-true/shift/and/xor) is an external collaborator whose interface contract this
//! crate assumes. Rather than inventing a bespoke trait hierarchy, this module is a thin,
//! generic layer over the standard library's portable-SIMD vector type
//! ([`core::simd::Simd`]), so every kernel is written once against `Simd<T, N>` and the
//! per-backend code generation genuinely is someone else's problem (LLVM's, in this case).
//!
//! `compress` has no direct portable-SIMD equivalent, so it is synthesized here the same way
//! Highway's own generic (non-intrinsic) fallback does it: scan the mask once to build a
//! selected-lanes-first index permutation, then materialize it with a gather. This is the one
//! place in this module that is not a one-line call into `core::simd`.

use std::simd::cmp::SimdPartialOrd;
use std::simd::{LaneCount, Mask, Simd, SimdElement, SupportedLaneCount};

/// Numeric lanes this crate's sort core can compare and compress. Implemented for the four
/// sort element types; kept separate from matmul's lane needs (which additionally include
/// `half::f16`/`half::bf16` and never need ordering compares).
pub trait OrdLane: SimdElement + PartialOrd + Copy {}
impl OrdLane for i32 {}
impl OrdLane for i64 {}
impl OrdLane for f32 {}
impl OrdLane for f64 {}

/// Convenience bound bundling everything a sort kernel needs from a lane type at a fixed
/// vector width `N`: ordering compares, a default value (for [`compress`]'s unspecified
/// tail lanes), and `Simd<Self, N>` supporting partial-order compares with masks shaped for
/// this width. Exists purely to keep the generic kernels' `where` clauses readable.
pub trait VectorLane<const N: usize>: OrdLane + Default
where
    LaneCount<N>: SupportedLaneCount,
    Simd<Self, N>: SimdPartialOrd<Mask = Mask<Self::Mask, N>>,
{
}

impl<T, const N: usize> VectorLane<N> for T
where
    T: OrdLane + Default,
    LaneCount<N>: SupportedLaneCount,
    Simd<T, N>: SimdPartialOrd<Mask = Mask<T::Mask, N>>,
{
}

/// Loads `N` lanes from `slice[..N]`.
#[inline(always)]
pub fn load<T, const N: usize>(slice: &[T]) -> Simd<T, N>
where
    T: SimdElement,
    LaneCount<N>: SupportedLaneCount,
{
    Simd::from_slice(slice)
}

/// Stores `v`'s `N` lanes into `slice[..N]`.
#[inline(always)]
pub fn store<T, const N: usize>(v: Simd<T, N>, slice: &mut [T])
where
    T: SimdElement,
    LaneCount<N>: SupportedLaneCount,
{
    v.copy_to_slice(slice);
}

/// Broadcasts `scalar` to all `N` lanes.
#[inline(always)]
pub fn broadcast<T, const N: usize>(scalar: T) -> Simd<T, N>
where
    T: SimdElement,
    LaneCount<N>: SupportedLaneCount,
{
    Simd::splat(scalar)
}

/// Elementwise `v < p`.
#[inline(always)]
pub fn cmp_lt<T, const N: usize>(v: Simd<T, N>, p: Simd<T, N>) -> Mask<T::Mask, N>
where
    T: OrdLane,
    Simd<T, N>: SimdPartialOrd<Mask = Mask<T::Mask, N>>,
    LaneCount<N>: SupportedLaneCount,
{
    v.simd_lt(p)
}

/// Elementwise `v > p`.
#[inline(always)]
pub fn cmp_gt<T, const N: usize>(v: Simd<T, N>, p: Simd<T, N>) -> Mask<T::Mask, N>
where
    T: OrdLane,
    Simd<T, N>: SimdPartialOrd<Mask = Mask<T::Mask, N>>,
    LaneCount<N>: SupportedLaneCount,
{
    v.simd_gt(p)
}

/// Number of `true` lanes in `mask`.
#[inline(always)]
pub fn count_true<M, const N: usize>(mask: Mask<M, N>) -> usize
where
    M: std::simd::MaskElement,
    LaneCount<N>: SupportedLaneCount,
{
    mask.to_array().iter().filter(|&&b| b).count()
}

/// Index, if any, of the first `true` lane in `mask`.
#[inline(always)]
pub fn find_first_true<M, const N: usize>(mask: Mask<M, N>) -> Option<usize>
where
    M: std::simd::MaskElement,
    LaneCount<N>: SupportedLaneCount,
{
    mask.to_array().iter().position(|&b| b)
}

/// Whether every lane of `mask` is `true`.
#[inline(always)]
pub fn all_true<M, const N: usize>(mask: Mask<M, N>) -> bool
where
    M: std::simd::MaskElement,
    LaneCount<N>: SupportedLaneCount,
{
    mask.all()
}

/// Whether every lane of `mask` is `false`.
#[inline(always)]
pub fn all_false<M, const N: usize>(mask: Mask<M, N>) -> bool
where
    M: std::simd::MaskElement,
    LaneCount<N>: SupportedLaneCount,
{
    !mask.any()
}

/// `compress(v, mask)`: returns a vector whose first `count_true(mask)` lanes are the
/// selected lanes of `v`, in their original relative order; the remaining lanes are
/// unspecified (here: zero-filled, which is cheap and deterministic, but callers must not
/// depend on it per the primitive's contract).
///
/// Mirrors Highway's generic (non-intrinsic) compress fallback: walk the mask once, bump a
/// write cursor for every selected lane.
#[inline(always)]
pub fn compress<T, const N: usize>(v: Simd<T, N>, mask: Mask<T::Mask, N>) -> Simd<T, N>
where
    T: SimdElement + Default,
    LaneCount<N>: SupportedLaneCount,
{
    let v_arr = v.to_array();
    let m_arr = mask.to_array();
    let mut out = [T::default(); N];
    let mut w = 0;
    for i in 0..N {
        if m_arr[i] {
            out[w] = v_arr[i];
            w += 1;
        }
    }
    Simd::from_array(out)
}
