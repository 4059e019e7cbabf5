//! Quote entry points
//!
//! Liquidity, swap and fee/reward quotes computed from read-only snapshots.

pub mod fees;
pub mod liquidity;
pub mod swap;

pub use fees::{collect_fees_quote, collect_fees_quote_from_arrays, collect_rewards_quote};
pub use liquidity::{add_liquidity_quote, estimate_position_amounts, remove_liquidity_quote};
pub use swap::{
    compute_swap_step, simulate_swap, simulate_swap_async, SwapProgress, SwapSimulation, SwapState,
    SwapStep,
};
