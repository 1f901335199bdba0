//! The narrow-float seam (§9 "f16/bf16 widening"): every matmul kernel accumulates in `f32`
//! regardless of the element type moving through memory. For `f32`/`f64` that's the native
//! type already; for `half::f16`/`half::bf16` this module is the single widen/pack helper
//! every narrow-float matmul variant routes through, rather than each kernel re-deriving its
//! own conversion loop.

/// A matmul lane type that is not already `f32`: convertible to/from `f32` so the tile
/// kernels can accumulate at full precision and pack back down on store.
pub trait NarrowFloat: Copy + Default {
    /// Widens to `f32`.
    fn to_f32(self) -> f32;
    /// Narrows from `f32`, rounding to nearest.
    fn from_f32(v: f32) -> Self;
}

impl NarrowFloat for half::f16 {
    fn to_f32(self) -> f32 {
        half::f16::to_f32(self)
    }
    fn from_f32(v: f32) -> Self {
        half::f16::from_f32(v)
    }
}

impl NarrowFloat for half::bf16 {
    fn to_f32(self) -> f32 {
        half::bf16::to_f32(self)
    }
    fn from_f32(v: f32) -> Self {
        half::bf16::from_f32(v)
    }
}

/// Widens `src` into the caller-supplied `f32` scratch buffer, which must be exactly
/// `src.len()` long. This and [`narrow_into`] are the pack/unpack pair every f16/bf16 matmul
/// variant calls instead of allocating; the scratch is sized once by the caller (a tile's
/// worth of elements, never a whole matrix) to keep the kernels allocation-free.
pub fn widen_into<T: NarrowFloat>(src: &[T], scratch: &mut [f32]) {
    debug_assert_eq!(src.len(), scratch.len());
    for (s, d) in src.iter().zip(scratch.iter_mut()) {
        *d = s.to_f32();
    }
}

/// Packs `scratch` back down into `dst`, the inverse of [`widen_into`].
pub fn narrow_into<T: NarrowFloat>(scratch: &[f32], dst: &mut [T]) {
    debug_assert_eq!(scratch.len(), dst.len());
    for (s, d) in scratch.iter().zip(dst.iter_mut()) {
        *d = T::from_f32(*s);
    }
}
