//! The float sortable-key bijection `s`/`s⁻¹` (§4.6): reinterprets an IEEE-754 float's bit
//! pattern as an unsigned integer that sorts the same way the float does under total order.
//!
//! For a positive float, the raw bit pattern already sorts correctly as unsigned. For a
//! negative float, larger magnitude means a *smaller* signed value but a *larger* raw bit
//! pattern (sign bit set, then magnitude bits ascending), so the bits need flipping. The
//! standard trick: if the sign bit is set, flip every bit; otherwise flip only the sign bit.
//! `s⁻¹` undoes this by checking the (now-restored) sign bit instead.

/// Maps an `f32` to a `u32` that sorts identically to the float's total order.
#[inline(always)]
pub fn sortable_u32(bits: u32) -> u32 {
    let mask = (((bits as i32) >> 31) as u32) | 0x8000_0000;
    bits ^ mask
}

/// Inverse of [`sortable_u32`].
#[inline(always)]
pub fn unsortable_u32(key: u32) -> u32 {
    let mask = ((!(key as i32) >> 31) as u32) | 0x8000_0000;
    key ^ mask
}

/// Maps an `f64` to a `u64` that sorts identically to the float's total order.
#[inline(always)]
pub fn sortable_u64(bits: u64) -> u64 {
    let mask = (((bits as i64) >> 63) as u64) | 0x8000_0000_0000_0000;
    bits ^ mask
}

/// Inverse of [`sortable_u64`].
#[inline(always)]
pub fn unsortable_u64(key: u64) -> u64 {
    let mask = ((!(key as i64) >> 63) as u64) | 0x8000_0000_0000_0000;
    key ^ mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_f32() {
        for x in [0.0f32, -0.0, 1.0, -1.0, f32::MAX, f32::MIN, f32::MIN_POSITIVE, -f32::MIN_POSITIVE] {
            let bits = x.to_bits();
            assert_eq!(unsortable_u32(sortable_u32(bits)), bits);
        }
    }

    #[test]
    fn roundtrips_f64() {
        for x in [0.0f64, -0.0, 1.0, -1.0, f64::MAX, f64::MIN] {
            let bits = x.to_bits();
            assert_eq!(unsortable_u64(sortable_u64(bits)), bits);
        }
    }

    #[test]
    fn preserves_total_order_f32() {
        let mut values = vec![-5.0f32, -0.5, 0.0, 0.5, 5.0, -100.0, 100.0, f32::MIN, f32::MAX];
        let mut by_key = values.clone();
        by_key.sort_by_key(|x| sortable_u32(x.to_bits()));
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, by_key);
    }

    #[test]
    fn preserves_total_order_f64() {
        let mut values = vec![-5.0f64, -0.5, 0.0, 0.5, 5.0, -100.0, 100.0, f64::MIN, f64::MAX];
        let mut by_key = values.clone();
        by_key.sort_by_key(|x| sortable_u64(x.to_bits()));
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, by_key);
    }
}
