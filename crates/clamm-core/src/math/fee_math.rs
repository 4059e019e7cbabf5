//! # Fee Math
//!
//! Growth accumulators for fees and rewards. Global and per-tick growth values
//! are Q64.64 amounts per unit of liquidity and wrap modulo 2^128.

use ethnum::U256;

use crate::constants::{FEE_RATE_MUL_VALUE, Q64_RESOLUTION};
use crate::errors::{CoreError, CoreResult};
use crate::math::big_int::{mul_div_u128, u256_to_u64, Rounding};
use crate::math::safe_math::{add_growth, sub_growth};

/// Growth per unit of liquidity for a fee amount: `(fee << 64) / L`
pub fn calculate_fee_growth(fee_amount: u64, liquidity: u128) -> CoreResult<u128> {
    if liquidity == 0 {
        return Err(CoreError::DivideByZero);
    }
    Ok(((fee_amount as u128) << Q64_RESOLUTION) / liquidity)
}

/// Protocol share of a swap fee, rounded down
pub fn calculate_protocol_fee(fee_amount: u64, protocol_fee_rate: u32) -> u64 {
    // protocol_fee_rate <= 1_000_000, so the share never exceeds fee_amount
    ((fee_amount as u128 * protocol_fee_rate as u128) / FEE_RATE_MUL_VALUE) as u64
}

/// Growth accumulated strictly inside `[tick_lower, tick_upper)`
///
/// Outside values are relative to the side of the tick away from the current
/// price, so each one is flipped when the current tick is on the other side.
pub fn calculate_growth_inside(
    tick_current: i32,
    tick_lower: i32,
    growth_outside_lower: u128,
    tick_upper: i32,
    growth_outside_upper: u128,
    growth_global: u128,
) -> u128 {
    let growth_below = if tick_current < tick_lower {
        sub_growth(growth_global, growth_outside_lower)
    } else {
        growth_outside_lower
    };

    let growth_above = if tick_current < tick_upper {
        growth_outside_upper
    } else {
        sub_growth(growth_global, growth_outside_upper)
    };

    sub_growth(sub_growth(growth_global, growth_below), growth_above)
}

/// Amount earned since the checkpoint: `((inside - checkpoint) * L) >> 64`
pub fn calculate_owed_delta(
    liquidity: u128,
    growth_inside: u128,
    growth_inside_checkpoint: u128,
) -> CoreResult<u64> {
    let growth_delta = sub_growth(growth_inside, growth_inside_checkpoint);
    let owed = (U256::from(liquidity) * U256::from(growth_delta)) >> Q64_RESOLUTION;
    u256_to_u64(owed)
}

/// Previously owed amount plus what accrued since the checkpoint
pub fn calculate_owed(
    owed: u64,
    liquidity: u128,
    growth_inside: u128,
    growth_inside_checkpoint: u128,
) -> CoreResult<u64> {
    let delta = calculate_owed_delta(liquidity, growth_inside, growth_inside_checkpoint)?;
    owed.checked_add(delta).ok_or(CoreError::AmountExceedsMax)
}

/// Reward growth after `time_delta` seconds of emissions over liquidity `L`
///
/// Matches the pool program: no growth without liquidity, and a delta that
/// overflows u128 is dropped.
pub fn accrue_reward_growth(
    growth_global: u128,
    emissions_per_second_x64: u128,
    liquidity: u128,
    time_delta: u64,
) -> u128 {
    if liquidity == 0 || time_delta == 0 {
        return growth_global;
    }

    let delta = mul_div_u128(
        time_delta as u128,
        emissions_per_second_x64,
        liquidity,
        Rounding::Down,
    )
    .unwrap_or(0);

    add_growth(growth_global, delta)
}
