//! # Position Snapshot
//!
//! Read-only view of a liquidity position and its accrual checkpoints.

use crate::constants::{MAX_TICK, MIN_TICK, NUM_REWARDS};
use crate::errors::{CoreError, CoreResult};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Reward checkpoint of a position for one pool reward slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PositionRewardInfo {
    /// Reward growth inside the range when last checkpointed, Q64.64
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub growth_inside_checkpoint: u128,

    /// Rewards owed as of the checkpoint
    pub amount_owed: u64,
}

/// Position state needed for liquidity and fee quotes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PositionSnapshot {
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub liquidity: u128,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub fee_growth_checkpoint_a: u128,
    pub fee_owed_a: u64,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub fee_growth_checkpoint_b: u128,
    pub fee_owed_b: u64,

    pub reward_infos: [PositionRewardInfo; NUM_REWARDS],
}

impl PositionSnapshot {
    /// Validated tick range of the position
    pub fn range(&self) -> CoreResult<TickRange> {
        TickRange::new(self.tick_lower_index, self.tick_upper_index)
    }
}

/// A validated `[lower, upper)` tick range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TickRange {
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
}

impl TickRange {
    /// Fails with `InvalidRange` unless `lower < upper`, `OutOfRange` outside tick bounds
    pub fn new(tick_lower_index: i32, tick_upper_index: i32) -> CoreResult<Self> {
        if tick_lower_index >= tick_upper_index {
            return Err(CoreError::invalid_range(tick_lower_index, tick_upper_index));
        }
        if tick_lower_index < MIN_TICK || tick_upper_index > MAX_TICK {
            return Err(CoreError::OutOfRange);
        }
        Ok(Self {
            tick_lower_index,
            tick_upper_index,
        })
    }

    /// Where the current tick sits relative to this range
    pub fn status(&self, tick_current_index: i32) -> PositionStatus {
        if tick_current_index < self.tick_lower_index {
            PositionStatus::BelowRange
        } else if tick_current_index < self.tick_upper_index {
            PositionStatus::InRange
        } else {
            PositionStatus::AboveRange
        }
    }
}

/// Current price relative to a position range
///
/// The upper tick is exclusive: a pool sitting exactly on the upper tick
/// holds the position entirely in token B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum PositionStatus {
    /// Position holds only token A
    BelowRange,
    /// Position holds both tokens and earns fees
    InRange,
    /// Position holds only token B
    AboveRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(TickRange::new(-10, 10).is_ok());
        assert_eq!(
            TickRange::new(10, 10),
            Err(CoreError::invalid_range(10, 10))
        );
        assert_eq!(
            TickRange::new(10, -10),
            Err(CoreError::invalid_range(10, -10))
        );
        assert_eq!(TickRange::new(MIN_TICK - 1, 0), Err(CoreError::OutOfRange));
        assert_eq!(TickRange::new(0, MAX_TICK + 1), Err(CoreError::OutOfRange));
    }

    #[test]
    fn test_position_status_boundaries() {
        let range = TickRange::new(-10, 10).unwrap();
        assert_eq!(range.status(-11), PositionStatus::BelowRange);
        assert_eq!(range.status(-10), PositionStatus::InRange);
        assert_eq!(range.status(9), PositionStatus::InRange);
        assert_eq!(range.status(10), PositionStatus::AboveRange);
        assert_eq!(range.status(11), PositionStatus::AboveRange);
    }

    #[test]
    fn test_position_range() {
        let position = PositionSnapshot {
            tick_lower_index: 64,
            tick_upper_index: -64,
            ..Default::default()
        };
        assert!(matches!(position.range(), Err(CoreError::InvalidRange { .. })));
    }
}
