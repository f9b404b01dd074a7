//! Bit-field operations on 256-bit storage words.
//!
//! These are the same shift-and-mask expressions the generated accessors
//! use: `load = (word >> offset) & mask`,
//! `store = (word & !(mask << offset)) | ((value & mask) << offset)`.

use alloy_primitives::U256;
use pw_schema::WORD_BITS;

/// Sub-slots of 64 bits per word in the reference stores.
pub const REFS_PER_WORD: usize = 4;

/// `(1 << bits) - 1`, saturating to all ones for a full word.
pub fn field_mask(bits: u32) -> U256 {
    if bits >= WORD_BITS {
        U256::MAX
    } else {
        (U256::from(1u8) << bits as usize) - U256::from(1u8)
    }
}

/// Read `bits` bits starting at `offset`.
pub fn extract(word: U256, offset: u32, bits: u32) -> U256 {
    (word >> offset as usize) & field_mask(bits)
}

/// Replace `bits` bits starting at `offset` with the low bits of `value`.
pub fn insert(word: U256, offset: u32, bits: u32, value: U256) -> U256 {
    let mask = field_mask(bits);
    let cleared = word & !(mask << offset as usize);
    cleared | ((value & mask) << offset as usize)
}

/// The 64-bit reference in sub-slot `index` (0 is the least significant).
#[inline]
pub fn sub_slot(word: U256, index: usize) -> u64 {
    word.as_limbs()[index]
}

/// `word` with sub-slot `index` replaced by `value`.
#[inline]
pub fn with_sub_slot(word: U256, index: usize, value: u64) -> U256 {
    let mut limbs = *word.as_limbs();
    limbs[index] = value;
    U256::from_limbs(limbs)
}

/// Occupied sub-slots of a word that is filled from sub-slot 0 upwards,
/// found by probing from the top down.
pub fn filled_sub_slots(word: U256) -> usize {
    (0..REFS_PER_WORD)
        .rev()
        .find(|&i| sub_slot(word, i) != 0)
        .map_or(0, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_widths() {
        assert_eq!(field_mask(8), U256::from(0xffu64));
        assert_eq!(field_mask(64), U256::from(u64::MAX));
        assert_eq!(field_mask(256), U256::MAX);
    }

    #[test]
    fn insert_preserves_neighbours() {
        let word = U256::MAX;
        let updated = insert(word, 64, 64, U256::ZERO);
        assert_eq!(sub_slot(updated, 0), u64::MAX);
        assert_eq!(sub_slot(updated, 1), 0);
        assert_eq!(sub_slot(updated, 2), u64::MAX);
        assert_eq!(extract(updated, 128, 128), field_mask(128));
    }

    #[test]
    fn insert_truncates_wide_values() {
        let updated = insert(U256::ZERO, 8, 8, U256::from(0x1ffu64));
        assert_eq!(updated, U256::from(0xff00u64));
    }

    #[test]
    fn sub_slots_are_limbs() {
        let word = with_sub_slot(with_sub_slot(U256::ZERO, 0, 5), 2, 9);
        assert_eq!(extract(word, 128, 64), U256::from(9u64));
        assert_eq!(filled_sub_slots(word), 3);
        assert_eq!(filled_sub_slots(U256::ZERO), 0);
    }
}
