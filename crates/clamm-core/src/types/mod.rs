//! Snapshot, tick array and quote types

pub mod pool;
pub mod position;
pub mod quotes;
pub mod tick;
pub mod tick_array;

#[cfg(feature = "client")]
pub mod serde_u128;

pub use pool::{PoolSnapshot, RewardInfo};
pub use position::{PositionRewardInfo, PositionSnapshot, PositionStatus, TickRange};
pub use quotes::{
    AddLiquidityQuote, AmountSpecified, CollectFeesQuote, CollectRewardsQuote, PositionAmounts,
    RemoveLiquidityQuote, SlippageTolerance, SwapDirection, SwapQuote, SwapRequest, TokenInput,
};
pub use tick::Tick;
pub use tick_array::{TickArray, TickSearch};
