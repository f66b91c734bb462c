//! Arithmetic fault policy
//!
//! Divide- and modulo-by-zero are resolved synchronously by the divide
//! handlers themselves, check-before-divide, instead of trapping a hardware
//! fault after the fact. The synthesized results match the legacy engine:
//! float division yields a signed maximum-magnitude sentinel, integer
//! division saturates toward the dividend's sign, and any modulo yields
//! zero. Unsigned division was never a recognized pattern and always
//! faults.

use crate::value::Word;

/// Positive float sentinel: the bit pattern of `f32::MAX`
const FLOAT_MAX_BITS: u32 = 0x7f7f_ffff;
/// Negative float sentinel
const FLOAT_MIN_BITS: u32 = 0xff7f_ffff;

/// Result of `a / 0.0`; sign from the XOR of the operand signs, so
/// `0.0 / 0.0` comes out positive.
pub(crate) fn float_div_by_zero(a: Word, b: Word) -> Word {
    if a.sign_bit() ^ b.sign_bit() != 0 {
        Word::from_raw(FLOAT_MIN_BITS)
    } else {
        Word::from_raw(FLOAT_MAX_BITS)
    }
}

/// Result of integer `a / 0`: saturate toward the dividend's sign
pub(crate) fn int_div_by_zero(a: Word) -> Word {
    if a.as_i32() < 0 {
        Word::from_i32(i32::MIN)
    } else {
        Word::from_i32(i32::MAX)
    }
}

/// Result of any modulo by zero
pub(crate) fn mod_by_zero() -> Word {
    Word::ZERO
}
