//! The 15-bit word domain and its modulo-32768 arithmetic.
//!
//! Words are carried as `u16` but every value the machine produces lies in
//! `0..=MAX_WORD`. Results are reduced modulo [`MODULUS`] before they are
//! stored anywhere.

/// A machine word. Valid values are `0..=MAX_WORD`.
pub type Word = u16;

/// Arithmetic modulus: 2^15.
pub const MODULUS: u32 = 32768;

/// Largest representable word.
pub const MAX_WORD: Word = 32767;

/// Mask selecting the low 15 bits.
pub const WORD_MASK: Word = 0x7FFF;

/// Number of addressable words (the full 15-bit address space).
pub const ADDRESS_SPACE: usize = 32768;

/// Reduce an intermediate result into the word domain.
pub fn wrap(value: u32) -> Word {
    (value % MODULUS) as Word
}

/// `(a + b) mod 32768`.
pub fn add(a: Word, b: Word) -> Word {
    wrap(a as u32 + b as u32)
}

/// `(a * b) mod 32768`.
pub fn mul(a: Word, b: Word) -> Word {
    wrap(a as u32 * b as u32)
}

/// `a mod b`, or `None` when `b` is zero.
pub fn rem(a: Word, b: Word) -> Option<Word> {
    a.checked_rem(b)
}

/// Bitwise AND, masked to 15 bits.
pub fn and(a: Word, b: Word) -> Word {
    a & b & WORD_MASK
}

/// Bitwise OR, masked to 15 bits.
pub fn or(a: Word, b: Word) -> Word {
    (a | b) & WORD_MASK
}

/// 15-bit bitwise complement.
pub fn not(a: Word) -> Word {
    !a & WORD_MASK
}

/// Returns true if `value` lies in the word domain.
pub fn is_word(value: u16) -> bool {
    value <= MAX_WORD
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_wraps_at_modulus() {
        assert_eq!(add(32767, 1), 0);
        assert_eq!(add(32758, 15), 5);
        assert_eq!(add(2, 3), 5);
    }

    #[test]
    fn mul_wraps_at_modulus() {
        assert_eq!(mul(16384, 2), 0);
        assert_eq!(mul(32767, 32767), 1);
        assert_eq!(mul(7, 6), 42);
    }

    #[test]
    fn rem_by_zero_is_none() {
        assert_eq!(rem(10, 0), None);
        assert_eq!(rem(10, 3), Some(1));
    }

    #[test]
    fn not_masks_to_fifteen_bits() {
        assert_eq!(not(0), 32767);
        assert_eq!(not(32767), 0);
        assert_eq!(not(0b101), 0x7FFA);
    }

    #[test]
    fn and_or_stay_in_domain() {
        assert_eq!(and(0b1100, 0b1010), 0b1000);
        assert_eq!(or(0b1100, 0b1010), 0b1110);
        assert_eq!(or(0x4000, 0x3FFF), MAX_WORD);
    }

    #[test]
    fn word_domain_boundary() {
        assert!(is_word(0));
        assert!(is_word(MAX_WORD));
        assert!(!is_word(32768));
    }

    proptest! {
        #[test]
        fn add_is_modular(a in 0..=MAX_WORD, b in 0..=MAX_WORD) {
            prop_assert_eq!(add(a, b) as u32, (a as u32 + b as u32) % MODULUS);
            prop_assert!(is_word(add(a, b)));
        }

        #[test]
        fn mul_is_modular(a in 0..=MAX_WORD, b in 0..=MAX_WORD) {
            prop_assert_eq!(mul(a, b) as u32, (a as u32 * b as u32) % MODULUS);
        }

        #[test]
        fn not_is_an_involution(x in 0..=MAX_WORD) {
            prop_assert_eq!(not(not(x)), x);
            prop_assert!(is_word(not(x)));
        }
    }
}
