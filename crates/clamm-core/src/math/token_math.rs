//! # Token Math
//!
//! Token deltas for a liquidity amount between two sqrt prices, the inverse
//! (liquidity from a token amount), and the next sqrt price after moving a
//! token amount through constant liquidity.
//!
//! Token A is the base token (`Δa = L * (1/√P_lo - 1/√P_hi)`), token B the
//! quote token (`Δb = L * (√P_hi - √P_lo)`). Rounding is always explicit and
//! follows the pool program: amounts paid by the caller round up, amounts
//! received round down.

use ethnum::U256;

use crate::constants::{MAX_SQRT_PRICE, MIN_SQRT_PRICE, Q64_MASK, Q64_RESOLUTION};
use crate::errors::{CoreError, CoreResult};
use crate::math::big_int::{checked_shl, div_round, u256_to_u128, Rounding};

/// A token delta that may not fit in a u64 amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountDelta {
    Valid(u64),
    ExceedsMax,
}

impl AmountDelta {
    pub fn lte(self, other: u64) -> bool {
        match self {
            AmountDelta::Valid(value) => value <= other,
            AmountDelta::ExceedsMax => false,
        }
    }

    pub fn exceeds_max(self) -> bool {
        matches!(self, AmountDelta::ExceedsMax)
    }

    /// The amount, or `AmountExceedsMax`
    pub fn value(self) -> CoreResult<u64> {
        match self {
            AmountDelta::Valid(value) => Ok(value),
            AmountDelta::ExceedsMax => Err(CoreError::AmountExceedsMax),
        }
    }
}

fn to_amount_delta(value: U256) -> AmountDelta {
    let (hi, lo) = value.into_words();
    match u64::try_from(lo) {
        Ok(amount) if hi == 0 => AmountDelta::Valid(amount),
        _ => AmountDelta::ExceedsMax,
    }
}

fn ordered(sqrt_price_0: u128, sqrt_price_1: u128) -> (u128, u128) {
    if sqrt_price_0 > sqrt_price_1 {
        (sqrt_price_1, sqrt_price_0)
    } else {
        (sqrt_price_0, sqrt_price_1)
    }
}

// ============================================================================
// Token Deltas
// ============================================================================

/// Token A between two sqrt prices: `(L * (√P_hi - √P_lo) << 64) / (√P_hi * √P_lo)`
pub fn get_amount_a_delta(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    rounding: Rounding,
) -> CoreResult<AmountDelta> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_0, sqrt_price_1);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    let numerator = checked_shl(product, Q64_RESOLUTION)?;
    let denominator = U256::from(sqrt_price_upper) * U256::from(sqrt_price_lower);

    let quotient = div_round(numerator, denominator, rounding)?;
    Ok(to_amount_delta(quotient))
}

/// Token B between two sqrt prices: `(L * (√P_hi - √P_lo)) >> 64`
pub fn get_amount_b_delta(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    rounding: Rounding,
) -> CoreResult<AmountDelta> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_0, sqrt_price_1);
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(liquidity) * U256::from(sqrt_price_diff);
    let mut quotient = product >> Q64_RESOLUTION;
    if rounding == Rounding::Up && product & U256::from(Q64_MASK) != U256::ZERO {
        quotient += U256::ONE;
    }

    Ok(to_amount_delta(quotient))
}

// ============================================================================
// Liquidity From Amounts
// ============================================================================

/// Liquidity supplied by `amount` of token A over `[√P_lo, √P_hi]`, rounded down
pub fn get_liquidity_from_a(
    amount: u64,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
) -> CoreResult<u128> {
    if sqrt_price_lower >= sqrt_price_upper {
        return Err(CoreError::DivideByZero);
    }
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let product = U256::from(amount)
        .checked_mul(U256::from(sqrt_price_lower))
        .and_then(|value| value.checked_mul(U256::from(sqrt_price_upper)))
        .ok_or(CoreError::ArithmeticOverflow)?;

    let liquidity = (product / U256::from(sqrt_price_diff)) >> Q64_RESOLUTION;
    u256_to_u128(liquidity)
}

/// Liquidity supplied by `amount` of token B over `[√P_lo, √P_hi]`, rounded down
pub fn get_liquidity_from_b(
    amount: u64,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
) -> CoreResult<u128> {
    if sqrt_price_lower >= sqrt_price_upper {
        return Err(CoreError::DivideByZero);
    }
    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;

    let numerator = U256::from(amount) << Q64_RESOLUTION;
    u256_to_u128(numerator / U256::from(sqrt_price_diff))
}

// ============================================================================
// Next Sqrt Price
// ============================================================================

fn check_sqrt_price_bounds(sqrt_price: u128) -> CoreResult<u128> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(CoreError::OutOfBounds);
    }
    Ok(sqrt_price)
}

/// Sqrt price after adding (`add`) or removing `amount` of token A, rounded up
///
/// `√P' = (L * √P << 64) / ((L << 64) ± √P * amount)`
pub fn get_next_sqrt_price_from_a_round_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> CoreResult<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }

    let product = U256::from(sqrt_price) * U256::from(amount);
    let numerator = checked_shl(U256::from(liquidity) * U256::from(sqrt_price), Q64_RESOLUTION)?;
    let liquidity_shift_left = U256::from(liquidity) << Q64_RESOLUTION;

    let denominator = if add {
        liquidity_shift_left + product
    } else {
        if liquidity_shift_left <= product {
            return Err(CoreError::DivideByZero);
        }
        liquidity_shift_left - product
    };

    let next = div_round(numerator, denominator, Rounding::Up)?;
    let next = u256_to_u128(next).map_err(|_| CoreError::OutOfBounds)?;
    check_sqrt_price_bounds(next)
}

/// Sqrt price after adding (`add`) or removing `amount` of token B, rounded down
///
/// `√P' = √P ± (amount << 64) / L`
pub fn get_next_sqrt_price_from_b_round_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> CoreResult<u128> {
    if liquidity == 0 {
        return Err(CoreError::DivideByZero);
    }

    let amount_x64 = (amount as u128) << Q64_RESOLUTION;
    // Removing token B rounds the delta up so the price rounds down
    let delta = div_round(
        U256::from(amount_x64),
        U256::from(liquidity),
        Rounding::up_if(!add),
    )?;
    let delta = u256_to_u128(delta)?;

    let next = if add {
        sqrt_price.checked_add(delta)
    } else {
        sqrt_price.checked_sub(delta)
    }
    .ok_or(CoreError::OutOfBounds)?;

    check_sqrt_price_bounds(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;

    #[test]
    fn test_amount_deltas() {
        // L = 2^64 over sqrt prices 1.0 -> 2.0: Δb = 2^64, Δa = 2^63
        let two = 2 * Q64;
        assert_eq!(
            get_amount_b_delta(Q64, two, Q64, Rounding::Down).unwrap(),
            AmountDelta::ExceedsMax
        );
        assert_eq!(
            get_amount_b_delta(Q64, two, 1000, Rounding::Down).unwrap(),
            AmountDelta::Valid(1000)
        );
        assert_eq!(
            get_amount_a_delta(two, Q64, 1000, Rounding::Down).unwrap(),
            AmountDelta::Valid(500)
        );
        assert_eq!(
            get_amount_a_delta(Q64, two, 1001, Rounding::Down).unwrap(),
            AmountDelta::Valid(500)
        );
        assert_eq!(
            get_amount_a_delta(Q64, two, 1001, Rounding::Up).unwrap(),
            AmountDelta::Valid(501)
        );
    }

    #[test]
    fn test_amount_delta_rounding_b() {
        // 3 * 1.5 = 4.5
        let one_and_half = Q64 + Q64 / 2;
        let sqrt_upper = Q64 + one_and_half;
        assert_eq!(
            get_amount_b_delta(Q64, sqrt_upper, 3, Rounding::Down).unwrap(),
            AmountDelta::Valid(4)
        );
        assert_eq!(
            get_amount_b_delta(Q64, sqrt_upper, 3, Rounding::Up).unwrap(),
            AmountDelta::Valid(5)
        );
        assert_eq!(
            get_amount_b_delta(Q64, Q64, u128::MAX, Rounding::Up).unwrap(),
            AmountDelta::Valid(0)
        );
    }

    #[test]
    fn test_amount_delta_helpers() {
        assert!(AmountDelta::Valid(5).lte(5));
        assert!(!AmountDelta::Valid(6).lte(5));
        assert!(!AmountDelta::ExceedsMax.lte(u64::MAX));
        assert!(AmountDelta::ExceedsMax.exceeds_max());
        assert_eq!(AmountDelta::Valid(7).value().unwrap(), 7);
        assert_eq!(AmountDelta::ExceedsMax.value(), Err(CoreError::AmountExceedsMax));
    }

    #[test]
    fn test_liquidity_from_amounts() {
        // Orca reference values over ticks [-10, 10]
        let sqrt_lower = 18437523468038800957;
        let sqrt_upper = 18455969290605290427;

        assert_eq!(get_liquidity_from_a(1000, sqrt_lower, sqrt_upper).unwrap(), 1000049);
        assert_eq!(get_liquidity_from_b(1000, sqrt_lower, sqrt_upper).unwrap(), 1000049);
        assert_eq!(get_liquidity_from_a(500, Q64, sqrt_upper).unwrap(), 1000300);
        assert_eq!(get_liquidity_from_b(500, sqrt_lower, Q64).unwrap(), 1000300);

        assert_eq!(
            get_liquidity_from_b(1, Q64, Q64),
            Err(CoreError::DivideByZero)
        );
    }

    #[test]
    fn test_next_sqrt_price_from_a() {
        assert_eq!(get_next_sqrt_price_from_a_round_up(Q64, 1000, 0, true).unwrap(), Q64);

        // L = 1000 at price 1.0: adding 1000 A halves the sqrt price
        assert_eq!(
            get_next_sqrt_price_from_a_round_up(Q64, 1000, 1000, true).unwrap(),
            Q64 / 2
        );
        // removing 500 A doubles it
        assert_eq!(
            get_next_sqrt_price_from_a_round_up(Q64, 1000, 500, false).unwrap(),
            2 * Q64
        );
        // removing everything leaves no denominator
        assert_eq!(
            get_next_sqrt_price_from_a_round_up(Q64, 1000, 1000, false),
            Err(CoreError::DivideByZero)
        );
        // zero liquidity drives the price to zero
        assert_eq!(
            get_next_sqrt_price_from_a_round_up(Q64, 0, 1, true),
            Err(CoreError::OutOfBounds)
        );
    }

    #[test]
    fn test_next_sqrt_price_from_b() {
        assert_eq!(
            get_next_sqrt_price_from_b_round_down(Q64, 1000, 1000, true).unwrap(),
            2 * Q64
        );
        assert_eq!(
            get_next_sqrt_price_from_b_round_down(Q64, 1000, 500, false).unwrap(),
            Q64 / 2
        );
        // 2^64 / 3 rounds down when adding, up when removing
        assert_eq!(
            get_next_sqrt_price_from_b_round_down(Q64, 3, 1, true).unwrap(),
            Q64 + 6148914691236517205
        );
        assert_eq!(
            get_next_sqrt_price_from_b_round_down(Q64, 3, 1, false).unwrap(),
            Q64 - 6148914691236517206
        );
        assert_eq!(
            get_next_sqrt_price_from_b_round_down(Q64, 0, 1, true),
            Err(CoreError::DivideByZero)
        );
        assert_eq!(
            get_next_sqrt_price_from_b_round_down(Q64, 1, 1, false),
            Err(CoreError::OutOfBounds)
        );
    }
}
