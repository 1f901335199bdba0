//! The VQSort core: vectorized introsort, its radix-sort alternative, and the partition
//! primitives both share. `sort`/`nth_element`/`radix_sort` are the one-function-per-type
//! front door; everything underneath is reachable directly for callers that want to pick a
//! specific algorithm or partition primitive themselves.

pub mod heapsort;
pub mod introsort;
pub mod lane;
pub mod partition2;
pub mod partition3;
pub mod pivot;
pub mod radix;
pub mod small_sort;
pub mod sortable;

use lane::SortLane;
use partition3::DefaultPartition3;

/// `true` if `a` is sorted ascending under [`SortLane::lt`] (NaN lanes never violate this:
/// they never compare `<` to anything, including their neighbors).
pub fn is_sorted<T: SortLane>(a: &[T]) -> bool {
    a.windows(2).all(|w| !w[1].lt(&w[0]))
}

/// Gives each sort element type a no-argument entry point into the vectorized driver, so
/// callers can write `sort::sort(&mut values)` without threading a partition backend or lane
/// width through by hand. Implemented for exactly the four `vqsort`/`radix_sort` element
/// types per `spec.md`'s non-goals (unsigned integers and half-precision types are valid
/// matmul lanes but never sort lanes).
pub trait Sortable: SortLane {
    /// Dispatches to [`introsort::vqsort`] with this type's default partition backend and
    /// vector width.
    fn vqsort_dispatch(a: &mut [Self]);
    /// Dispatches to [`introsort::nth_element`].
    fn nth_element_dispatch(a: &mut [Self], k: usize);
    /// Dispatches to this type's `radix_sort_*` free function.
    fn radix_sort_dispatch(a: &mut [Self]);
}

macro_rules! impl_sortable {
    ($t:ty, $lanes:expr, $radix:path) => {
        impl Sortable for $t {
            fn vqsort_dispatch(a: &mut [Self]) {
                introsort::vqsort(a, &DefaultPartition3, $lanes());
            }
            fn nth_element_dispatch(a: &mut [Self], k: usize) {
                introsort::nth_element(a, k, &DefaultPartition3, $lanes());
            }
            fn radix_sort_dispatch(a: &mut [Self]) {
                $radix(a);
            }
        }
    };
}

impl_sortable!(i32, crate::dispatch::lanes_32bit, radix::radix_sort_i32);
impl_sortable!(i64, crate::dispatch::lanes_64bit, radix::radix_sort_i64);
impl_sortable!(f32, crate::dispatch::lanes_32bit, radix::radix_sort_f32);
impl_sortable!(f64, crate::dispatch::lanes_64bit, radix::radix_sort_f64);

/// Sorts `a` ascending using the vectorized introsort driver (§4.5).
pub fn sort<T: Sortable>(a: &mut [T]) {
    T::vqsort_dispatch(a);
}

/// Rearranges `a` so index `k` holds its sorted-order value (§4.7).
pub fn nth_element<T: Sortable>(a: &mut [T], k: usize) {
    T::nth_element_dispatch(a, k);
}

/// Sorts `a` ascending using radix sort, falling back to a comparison sort below
/// [`radix::RADIX_SORT_THRESHOLD`] elements (§4.6).
pub fn radix_sort<T: Sortable>(a: &mut [T]) {
    T::radix_sort_dispatch(a);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_sort_f32() {
        let mut a = vec![3.0f32, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0];
        sort(&mut a);
        assert_eq!(a, vec![1.0, 1.0, 2.0, 3.0, 3.0, 4.0, 5.0, 5.0, 5.0, 6.0, 9.0]);
        assert!(is_sorted(&a));
    }

    #[test]
    fn scenario_3_radix_sort_i32_extremes() {
        let mut a = vec![i32::MIN, i32::MAX, 0, -1, 1];
        radix_sort(&mut a);
        assert_eq!(a, vec![i32::MIN, -1, 0, 1, i32::MAX]);
    }

    #[test]
    fn scenario_6_nth_element() {
        let mut a = vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
        nth_element(&mut a, 4);
        assert_eq!(a[4], 5);
        assert!(a[..4].iter().all(|&x| x <= 5));
        assert!(a[4..].iter().all(|&x| x >= 5));
    }

    #[test]
    fn sort_is_a_permutation_for_i64() {
        let original: Vec<i64> = (0..3000).map(|i| (i * 48271) % 10_000 - 5000).collect();
        let mut a = original.clone();
        sort(&mut a);
        assert!(is_sorted(&a));
        let mut sorted_expected = original.clone();
        sorted_expected.sort();
        assert_eq!(a, sorted_expected);
    }
}
