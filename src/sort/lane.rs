//! The element-type vocabulary the sort core is monomorphized over.

use crate::simd::OrdLane;

/// A sortable lane type: orderable via `<`/`>` (with IEEE-754 NaN semantics left as `false`
/// both ways, see `spec.md` §9 "NaN semantics"), and able to supply a sentinel larger than
/// every representable finite value for sorting-network padding (§4.1).
pub trait SortLane: OrdLane + Copy + Default + std::fmt::Debug + 'static {
    /// A value greater than or equal to every value the small-network sort will ever see,
    /// used to pad a short slice up to a full vector so the network can run unconditionally.
    const SENTINEL_MAX: Self;

    /// `true` if `self < other`, with NaN comparing `false` against everything (including
    /// itself), matching `f32`/`f64`'s `PartialOrd`.
    fn lt(&self, other: &Self) -> bool {
        self.partial_cmp_total(other) == Some(std::cmp::Ordering::Less)
    }

    /// `true` if `self > other`.
    fn gt(&self, other: &Self) -> bool {
        self.partial_cmp_total(other) == Some(std::cmp::Ordering::Greater)
    }

    /// Thin seam over `PartialOrd::partial_cmp` so integer lanes (which are `Ord`) and float
    /// lanes (which are only `PartialOrd`) share one comparison path.
    fn partial_cmp_total(&self, other: &Self) -> Option<std::cmp::Ordering>;
}

impl SortLane for i32 {
    const SENTINEL_MAX: Self = i32::MAX;
    fn partial_cmp_total(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl SortLane for i64 {
    const SENTINEL_MAX: Self = i64::MAX;
    fn partial_cmp_total(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl SortLane for f32 {
    const SENTINEL_MAX: Self = f32::INFINITY;
    fn partial_cmp_total(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.partial_cmp(other)
    }
}

impl SortLane for f64 {
    const SENTINEL_MAX: Self = f64::INFINITY;
    fn partial_cmp_total(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.partial_cmp(other)
    }
}
