//! Big integer operations for high-precision math
//!
//! Q64.64 products overflow `u128`, so intermediates are widened to
//! `ethnum::U256`. Every multiply/divide helper takes an explicit
//! [`Rounding`]; nothing here rounds implicitly.

use ethnum::U256;

use crate::errors::{CoreError, CoreResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

impl Rounding {
    /// `Up` when `round_up` is set, `Down` otherwise
    pub const fn up_if(round_up: bool) -> Self {
        if round_up {
            Rounding::Up
        } else {
            Rounding::Down
        }
    }
}

/// Divide with the requested rounding
pub fn div_round(numerator: U256, denominator: U256, rounding: Rounding) -> CoreResult<U256> {
    if denominator == U256::ZERO {
        return Err(CoreError::DivideByZero);
    }

    let quotient = numerator / denominator;
    if rounding == Rounding::Up && numerator % denominator != U256::ZERO {
        return quotient
            .checked_add(U256::ONE)
            .ok_or(CoreError::ArithmeticOverflow);
    }

    Ok(quotient)
}

/// Multiply two values and divide by a third with specified rounding
/// result = (a * b) / denominator
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> CoreResult<U256> {
    if denominator == U256::ZERO {
        return Err(CoreError::DivideByZero);
    }

    let product = a.checked_mul(b).ok_or(CoreError::ArithmeticOverflow)?;
    div_round(product, denominator, rounding)
}

/// Multiply two u64 values and divide by a third with specified rounding
pub fn mul_div_u64(a: u64, b: u64, denominator: u64, rounding: Rounding) -> CoreResult<u64> {
    if denominator == 0 {
        return Err(CoreError::DivideByZero);
    }

    let product = (a as u128) * (b as u128);
    let quotient = product / (denominator as u128);
    let remainder = product % (denominator as u128);

    let mut result = quotient;
    if rounding == Rounding::Up && remainder > 0 {
        result += 1;
    }

    u64::try_from(result).map_err(|_| CoreError::AmountExceedsMax)
}

/// Multiply two u128 values and divide by a third with specified rounding
pub fn mul_div_u128(a: u128, b: u128, denominator: u128, rounding: Rounding) -> CoreResult<u128> {
    let result = mul_div(
        U256::from(a),
        U256::from(b),
        U256::from(denominator),
        rounding,
    )?;

    u256_to_u128(result)
}

/// `(a * b) >> shift`, rounding up when any shifted-out bit is set
pub fn mul_shift_right(a: u128, b: u128, shift: u32, rounding: Rounding) -> CoreResult<u128> {
    let product = U256::from(a) * U256::from(b);
    let mut result = product >> shift;
    if rounding == Rounding::Up && (result << shift) != product {
        result += U256::ONE;
    }

    u256_to_u128(result)
}

/// `(value << shift) / denominator` with specified rounding
pub fn div_shift_left(
    value: u128,
    shift: u32,
    denominator: u128,
    rounding: Rounding,
) -> CoreResult<u128> {
    let numerator = checked_shl(U256::from(value), shift)?;
    let result = div_round(numerator, U256::from(denominator), rounding)?;
    u256_to_u128(result)
}

/// Shift left, failing instead of dropping high bits
pub fn checked_shl(value: U256, shift: u32) -> CoreResult<U256> {
    if value != U256::ZERO && value.leading_zeros() < shift {
        return Err(CoreError::ArithmeticOverflow);
    }
    Ok(value << shift)
}

/// Narrow to u128, failing on overflow
pub fn u256_to_u128(value: U256) -> CoreResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(CoreError::ArithmeticOverflow);
    }
    Ok(lo)
}

/// Narrow to u64 token amount, failing with `AmountExceedsMax`
pub fn u256_to_u64(value: U256) -> CoreResult<u64> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(CoreError::AmountExceedsMax);
    }
    u64::try_from(lo).map_err(|_| CoreError::AmountExceedsMax)
}
