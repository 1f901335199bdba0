#[macro_use]
extern crate afl;

fn main() {
    fuzz!(|data: &[u8]| {
        let values: Vec<i32> = data.chunks_exact(4).map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect();
        if values.is_empty() {
            return;
        }

        let mut sorted = values.clone();
        vqmat::sort::sort(&mut sorted);

        assert!(vqmat::sort::is_sorted(&sorted));

        let mut expected = values;
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    });
}
