//! # Ticks
//!
//! Per-tick state and helpers for tick index arithmetic. A tick can only be
//! initialized when its index is a multiple of the pool's tick spacing.

use crate::constants::{MAX_TICK, MIN_TICK, NUM_REWARDS, TICK_ARRAY_SIZE};
use crate::math::big_int::Rounding;
use crate::types::position::TickRange;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// State stored for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct Tick {
    pub initialized: bool,

    /// Liquidity added when the price crosses this tick upwards
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::i128_string"))]
    pub liquidity_net: i128,

    /// Total liquidity referencing this tick
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub liquidity_gross: u128,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub fee_growth_outside_a: u128,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub fee_growth_outside_b: u128,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string_array"))]
    pub reward_growths_outside: [u128; NUM_REWARDS],
}

impl Tick {
    /// An initialized tick carrying `liquidity_net`
    pub fn with_liquidity_net(liquidity_net: i128) -> Self {
        Self {
            initialized: true,
            liquidity_net,
            liquidity_gross: liquidity_net.unsigned_abs(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Tick Index Helpers
// ============================================================================

/// Number of tick indexes covered by one tick array
pub const fn ticks_in_array(tick_spacing: u16) -> i32 {
    TICK_ARRAY_SIZE as i32 * tick_spacing as i32
}

/// Start index of the tick array containing `tick_index`
pub fn tick_array_start_index(tick_index: i32, tick_spacing: u16) -> i32 {
    let span = ticks_in_array(tick_spacing);
    tick_index.div_euclid(span) * span
}

/// Whether a tick can be initialized under the given spacing
pub fn is_tick_initializable(tick_index: i32, tick_spacing: u16) -> bool {
    tick_index.rem_euclid(tick_spacing as i32) == 0
}

/// Whether a tick lies within the protocol bounds
pub fn is_tick_in_bounds(tick_index: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick_index)
}

/// Snap a tick to the spacing grid; `None` rounds to the nearest multiple
pub fn initializable_tick_index(
    tick_index: i32,
    tick_spacing: u16,
    rounding: Option<Rounding>,
) -> i32 {
    let spacing = tick_spacing as i32;
    let floor = tick_index - tick_index.rem_euclid(spacing);
    let remainder = tick_index - floor;
    if remainder == 0 {
        return tick_index;
    }

    let round_up = match rounding {
        Some(Rounding::Up) => true,
        Some(Rounding::Down) => false,
        None => remainder * 2 >= spacing,
    };

    if round_up {
        floor + spacing
    } else {
        floor
    }
}

/// Greatest initializable tick strictly below `tick_index`
pub fn prev_initializable_tick_index(tick_index: i32, tick_spacing: u16) -> i32 {
    let spacing = tick_spacing as i32;
    let remainder = tick_index.rem_euclid(spacing);
    if remainder == 0 {
        tick_index - spacing
    } else {
        tick_index - remainder
    }
}

/// Smallest initializable tick strictly above `tick_index`
pub fn next_initializable_tick_index(tick_index: i32, tick_spacing: u16) -> i32 {
    let spacing = tick_spacing as i32;
    tick_index - tick_index.rem_euclid(spacing) + spacing
}

/// Widest initializable range for a tick spacing
pub fn full_range_tick_indexes(tick_spacing: u16) -> TickRange {
    let spacing = tick_spacing as i32;
    let max_initializable = MAX_TICK.div_euclid(spacing) * spacing;
    // tick bounds are symmetric around zero
    TickRange {
        tick_lower_index: -max_initializable,
        tick_upper_index: max_initializable,
    }
}

/// Order two tick indexes as `(lower, upper)`
pub fn order_tick_indexes(tick_index_1: i32, tick_index_2: i32) -> (i32, i32) {
    if tick_index_1 > tick_index_2 {
        (tick_index_2, tick_index_1)
    } else {
        (tick_index_1, tick_index_2)
    }
}
