//! Binary-heap sort, the introsort driver's worst-case fallback (§4.5) once recursion depth
//! exceeds `2 * floor(log2(n))`. O(n log n) worst case with no recursion, guaranteeing the
//! driver as a whole never degrades to quadratic time on adversarial pivot sequences.

use super::lane::SortLane;

fn sift_down<T: SortLane>(a: &mut [T], mut root: usize, end: usize) {
    loop {
        let left = 2 * root + 1;
        if left >= end {
            return;
        }
        let right = left + 1;
        let mut largest = left;
        if right < end && a[largest].lt(&a[right]) {
            largest = right;
        }
        if a[largest].lt(&a[root]) {
            return;
        }
        a.swap(root, largest);
        root = largest;
    }
}

/// Sorts `a` in place ascending.
pub fn heapsort<T: SortLane>(a: &mut [T]) {
    let n = a.len();
    if n < 2 {
        return;
    }
    for root in (0..n / 2).rev() {
        sift_down(a, root, n);
    }
    for end in (1..n).rev() {
        a.swap(0, end);
        sift_down(a, 0, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_reversed_input() {
        let mut a: Vec<i32> = (0..500).rev().collect();
        let expected: Vec<i32> = (0..500).collect();
        heapsort(&mut a);
        assert_eq!(a, expected);
    }

    #[test]
    fn sorts_with_duplicates() {
        let mut a = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        let mut expected = a.clone();
        expected.sort();
        heapsort(&mut a);
        assert_eq!(a, expected);
    }

    #[test]
    fn handles_empty_and_singleton() {
        let mut empty: Vec<i32> = vec![];
        heapsort(&mut empty);
        assert!(empty.is_empty());

        let mut one = vec![42];
        heapsort(&mut one);
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn floats_keep_nan_bit_patterns() {
        let mut a = vec![3.0f32, f32::NAN, 1.0, -2.0, f32::NAN];
        let nan_before = a.iter().filter(|x| x.is_nan()).count();
        heapsort(&mut a);
        assert_eq!(a.iter().filter(|x| x.is_nan()).count(), nan_before);
    }
}
