//! # Pool Snapshot
//!
//! Read-only view of a pool account as fetched by the host.

use crate::constants::{
    MAX_FEE_RATE, MAX_PROTOCOL_FEE_RATE, MAX_SQRT_PRICE, MIN_SQRT_PRICE, NUM_REWARDS,
};
use crate::errors::{CoreError, CoreResult};
use crate::math::tick_math::sqrt_price_at_tick;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// One reward emission slot of a pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct RewardInfo {
    /// Reward mint, `None` when the slot was never initialized
    #[cfg_attr(feature = "client", serde(default))]
    pub mint: Option<String>,

    /// Reward growth per unit of liquidity, Q64.64
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub growth_global_x64: u128,

    /// Reward tokens emitted per second, Q64.64
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub emissions_per_second_x64: u128,
}

impl RewardInfo {
    /// Whether a reward mint was assigned to this slot
    pub fn initialized(&self) -> bool {
        self.mint.is_some()
    }
}

/// Pool state needed for quoting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PoolSnapshot {
    /// Current sqrt price, Q64.64
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub sqrt_price: u128,

    /// Liquidity active at the current price
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub liquidity: u128,

    /// Greatest tick whose sqrt price is at or below `sqrt_price`
    pub tick_current_index: i32,

    pub tick_spacing: u16,

    /// Swap fee rate in parts per million
    pub fee_rate: u32,

    /// Share of each swap fee kept by the protocol, parts per million
    pub protocol_fee_rate: u32,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub fee_growth_global_a: u128,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub fee_growth_global_b: u128,

    pub reward_infos: [RewardInfo; NUM_REWARDS],

    /// Unix timestamp of the last reward growth update
    #[cfg_attr(feature = "client", serde(default))]
    pub reward_last_updated_timestamp: u64,
}

impl PoolSnapshot {
    /// Check the snapshot invariants the quote paths rely on
    pub fn validate(&self) -> CoreResult<()> {
        if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&self.sqrt_price) {
            return Err(CoreError::OutOfRange);
        }
        if self.tick_spacing == 0 {
            return Err(CoreError::invalid_config("tick spacing must be non-zero"));
        }
        if self.fee_rate >= MAX_FEE_RATE {
            return Err(CoreError::invalid_config(format!(
                "fee rate {} must be below {}",
                self.fee_rate, MAX_FEE_RATE
            )));
        }
        if self.protocol_fee_rate > MAX_PROTOCOL_FEE_RATE {
            return Err(CoreError::invalid_config(format!(
                "protocol fee rate {} exceeds {}",
                self.protocol_fee_rate, MAX_PROTOCOL_FEE_RATE
            )));
        }

        // The current tick must be the floor tick of the current price
        let tick_price = sqrt_price_at_tick(self.tick_current_index)?;
        if tick_price > self.sqrt_price {
            return Err(CoreError::OutOfRange);
        }

        Ok(())
    }
}
