//! # Fixed Point Conversions
//!
//! Q64.64 values are stored as `u128` holding `value * 2^64`. This module
//! converts between that representation, token amounts, 256-bit
//! intermediates and human-readable decimal prices.
//!
//! The decimal price helpers go through `fixed::types::U64F64` and `f64`.
//! They are for display and input parsing only; quote paths never use them.

use ethnum::U256;
use fixed::types::U64F64;

use crate::constants::{MAX_SQRT_PRICE, MIN_SQRT_PRICE, Q64_MASK, Q64_RESOLUTION};
use crate::errors::{CoreError, CoreResult};
use crate::math::big_int::{div_round, u256_to_u128, Rounding};
use crate::math::tick_math::{sqrt_price_at_tick, tick_at_sqrt_price};

// ============================================================================
// Exact Q64.64 Conversions
// ============================================================================

/// Lift a token amount into Q64.64
pub const fn u64_to_q64(value: u64) -> u128 {
    (value as u128) << Q64_RESOLUTION
}

/// Truncate a Q64.64 value to an integer amount with the given rounding
pub fn q64_to_u64(value: u128, rounding: Rounding) -> CoreResult<u64> {
    let mut integer = value >> Q64_RESOLUTION;
    if rounding == Rounding::Up && value & Q64_MASK != 0 {
        integer += 1;
    }
    u64::try_from(integer).map_err(|_| CoreError::AmountExceedsMax)
}

/// Widen a Q64.64 value for 256-bit intermediates
pub fn q64_to_u256(value: u128) -> U256 {
    U256::from(value)
}

/// Reciprocal of a sqrt price, `2^128 / sqrt_price`, in Q64.64
pub fn invert_sqrt_price(sqrt_price: u128, rounding: Rounding) -> CoreResult<u128> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(CoreError::OutOfRange);
    }
    let inverted = div_round(U256::ONE << 128u32, U256::from(sqrt_price), rounding)?;
    u256_to_u128(inverted)
}

// ============================================================================
// Display Conversions
// ============================================================================

/// Q64.64 value as a float
pub fn q64_to_f64(value: u128) -> f64 {
    U64F64::from_bits(value).to_num::<f64>()
}

/// Float as a Q64.64 value, `None` when negative, non-finite or too large
pub fn f64_to_q64(value: f64) -> Option<u128> {
    if !value.is_finite() {
        return None;
    }
    U64F64::checked_from_num(value).map(U64F64::to_bits)
}

fn decimals_factor(decimals_a: u8, decimals_b: u8) -> f64 {
    10f64.powi(decimals_a as i32 - decimals_b as i32)
}

/// Price of token A in token B, adjusted for mint decimals
pub fn sqrt_price_to_price(sqrt_price: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let sqrt = q64_to_f64(sqrt_price);
    sqrt * sqrt * decimals_factor(decimals_a, decimals_b)
}

/// Nearest Q64.64 sqrt price for a decimal-adjusted price
pub fn price_to_sqrt_price(price: f64, decimals_a: u8, decimals_b: u8) -> CoreResult<u128> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::OutOfRange);
    }

    let raw = price / decimals_factor(decimals_a, decimals_b);
    let sqrt_price = f64_to_q64(raw.sqrt()).ok_or(CoreError::OutOfRange)?;

    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(CoreError::OutOfRange);
    }
    Ok(sqrt_price)
}

/// Decimal-adjusted price at a tick index
pub fn tick_index_to_price(tick_index: i32, decimals_a: u8, decimals_b: u8) -> CoreResult<f64> {
    let sqrt_price = sqrt_price_at_tick(tick_index)?;
    Ok(sqrt_price_to_price(sqrt_price, decimals_a, decimals_b))
}

/// Tick index at or below a decimal-adjusted price
pub fn price_to_tick_index(price: f64, decimals_a: u8, decimals_b: u8) -> CoreResult<i32> {
    let sqrt_price = price_to_sqrt_price(price, decimals_a, decimals_b)?;
    tick_at_sqrt_price(sqrt_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;

    #[test]
    fn test_q64_amount_conversions() {
        assert_eq!(u64_to_q64(3), 3 * Q64);
        assert_eq!(q64_to_u64(3 * Q64 + 1, Rounding::Down).unwrap(), 3);
        assert_eq!(q64_to_u64(3 * Q64 + 1, Rounding::Up).unwrap(), 4);
        assert_eq!(q64_to_u64(3 * Q64, Rounding::Up).unwrap(), 3);
        // the integer part of u128::MAX is exactly u64::MAX
        assert_eq!(q64_to_u64(u128::MAX, Rounding::Down), Ok(u64::MAX));
        // rounding its fraction up carries to 2^64
        assert_eq!(
            q64_to_u64(u128::MAX, Rounding::Up),
            Err(CoreError::AmountExceedsMax)
        );
        assert_eq!(q64_to_u256(Q64), U256::ONE << 64u32);
    }

    #[test]
    fn test_invert_sqrt_price() {
        assert_eq!(invert_sqrt_price(Q64, Rounding::Down).unwrap(), Q64);
        // 1/2 inverted is 2
        assert_eq!(invert_sqrt_price(Q64 / 2, Rounding::Down).unwrap(), 2 * Q64);
        assert_eq!(invert_sqrt_price(3 * Q64, Rounding::Down).unwrap(), 6148914691236517205);
        assert_eq!(invert_sqrt_price(3 * Q64, Rounding::Up).unwrap(), 6148914691236517206);
        assert_eq!(invert_sqrt_price(0, Rounding::Down), Err(CoreError::OutOfRange));
    }

    #[test]
    fn test_display_prices() {
        assert_eq!(q64_to_f64(Q64), 1.0);
        assert_eq!(f64_to_q64(0.5), Some(Q64 / 2));
        assert_eq!(f64_to_q64(-1.0), None);
        assert_eq!(f64_to_q64(f64::NAN), None);

        // sqrt price 2.0 is price 4.0; 9 vs 6 decimals scales by 1000
        assert_eq!(sqrt_price_to_price(2 * Q64, 6, 6), 4.0);
        assert_eq!(sqrt_price_to_price(2 * Q64, 9, 6), 4000.0);

        assert_eq!(price_to_sqrt_price(4.0, 6, 6).unwrap(), 2 * Q64);
        assert_eq!(price_to_sqrt_price(4000.0, 9, 6).unwrap(), 2 * Q64);
        assert_eq!(price_to_sqrt_price(0.0, 6, 6), Err(CoreError::OutOfRange));
        assert_eq!(price_to_sqrt_price(1e60, 6, 6), Err(CoreError::OutOfRange));
    }

    #[test]
    fn test_tick_price_conversions() {
        assert_eq!(tick_index_to_price(0, 6, 6).unwrap(), 1.0);
        assert_eq!(price_to_tick_index(1.0, 6, 6).unwrap(), 0);

        let price = tick_index_to_price(1000, 6, 6).unwrap();
        assert!((price - 1.0001f64.powi(1000)).abs() < 1e-9);
        // float rounding may land on either side of the exact tick price
        let tick = price_to_tick_index(price, 6, 6).unwrap();
        assert!(tick == 999 || tick == 1000);
    }
}
