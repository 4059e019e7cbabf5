//! # Fee and Reward Quotes
//!
//! Fees and rewards a position can collect right now. Both are derived from
//! the growth accumulated inside the position's range since its last
//! checkpoint, so quoting twice against the same snapshots gives the same
//! result.

use crate::accessor::TickArrayAccessor;
use crate::constants::NUM_REWARDS;
use crate::errors::{CoreError, CoreResult};
use crate::math::fee_math::{accrue_reward_growth, calculate_growth_inside, calculate_owed};
use crate::types::pool::PoolSnapshot;
use crate::types::position::PositionSnapshot;
use crate::types::quotes::{CollectFeesQuote, CollectRewardsQuote};
use crate::types::tick::{tick_array_start_index, Tick};

/// Fees owed to `position` given the ticks at its range bounds
pub fn collect_fees_quote(
    pool: &PoolSnapshot,
    position: &PositionSnapshot,
    tick_lower: &Tick,
    tick_upper: &Tick,
) -> CoreResult<CollectFeesQuote> {
    let range = position.range()?;
    pool.validate()?;

    let growth_inside_a = calculate_growth_inside(
        pool.tick_current_index,
        range.tick_lower_index,
        tick_lower.fee_growth_outside_a,
        range.tick_upper_index,
        tick_upper.fee_growth_outside_a,
        pool.fee_growth_global_a,
    );
    let growth_inside_b = calculate_growth_inside(
        pool.tick_current_index,
        range.tick_lower_index,
        tick_lower.fee_growth_outside_b,
        range.tick_upper_index,
        tick_upper.fee_growth_outside_b,
        pool.fee_growth_global_b,
    );

    Ok(CollectFeesQuote {
        fee_owed_a: calculate_owed(
            position.fee_owed_a,
            position.liquidity,
            growth_inside_a,
            position.fee_growth_checkpoint_a,
        )?,
        fee_owed_b: calculate_owed(
            position.fee_owed_b,
            position.liquidity,
            growth_inside_b,
            position.fee_growth_checkpoint_b,
        )?,
    })
}

/// Fees owed to `position`, reading its bound ticks through `accessor`
pub fn collect_fees_quote_from_arrays<A: TickArrayAccessor + ?Sized>(
    pool: &PoolSnapshot,
    position: &PositionSnapshot,
    accessor: &A,
) -> CoreResult<CollectFeesQuote> {
    pool.validate()?;
    let (tick_lower, tick_upper) = bound_ticks(pool, position, accessor)?;
    collect_fees_quote(pool, position, &tick_lower, &tick_upper)
}

/// Rewards owed to `position` per reward slot
///
/// With `current_timestamp` set past the pool's last reward update, pool
/// growth is first accrued from emissions over the elapsed time.
pub fn collect_rewards_quote(
    pool: &PoolSnapshot,
    position: &PositionSnapshot,
    tick_lower: &Tick,
    tick_upper: &Tick,
    current_timestamp: Option<u64>,
) -> CoreResult<CollectRewardsQuote> {
    let range = position.range()?;
    pool.validate()?;

    let elapsed = current_timestamp
        .map(|timestamp| timestamp.saturating_sub(pool.reward_last_updated_timestamp))
        .unwrap_or(0);

    let mut rewards_owed = [None; NUM_REWARDS];
    for (index, reward) in pool.reward_infos.iter().enumerate() {
        if !reward.initialized() {
            continue;
        }

        let growth_global = accrue_reward_growth(
            reward.growth_global_x64,
            reward.emissions_per_second_x64,
            pool.liquidity,
            elapsed,
        );

        let growth_inside = calculate_growth_inside(
            pool.tick_current_index,
            range.tick_lower_index,
            tick_lower.reward_growths_outside[index],
            range.tick_upper_index,
            tick_upper.reward_growths_outside[index],
            growth_global,
        );

        let checkpoint = &position.reward_infos[index];
        rewards_owed[index] = Some(calculate_owed(
            checkpoint.amount_owed,
            position.liquidity,
            growth_inside,
            checkpoint.growth_inside_checkpoint,
        )?);
    }

    Ok(CollectRewardsQuote { rewards_owed })
}

/// Look up the ticks at a position's bounds
fn bound_ticks<A: TickArrayAccessor + ?Sized>(
    pool: &PoolSnapshot,
    position: &PositionSnapshot,
    accessor: &A,
) -> CoreResult<(Tick, Tick)> {
    let range = position.range()?;
    let fetch = |tick_index: i32| -> CoreResult<Tick> {
        let start_tick_index = tick_array_start_index(tick_index, pool.tick_spacing);
        let tick_array = accessor
            .fetch_tick_array(start_tick_index)
            .ok_or(CoreError::stale_tick_array(start_tick_index))?;
        if tick_array.start_tick_index != start_tick_index {
            return Err(CoreError::stale_tick_array(start_tick_index));
        }
        tick_array.get_tick(tick_index, pool.tick_spacing).copied()
    };

    Ok((fetch(range.tick_lower_index)?, fetch(range.tick_upper_index)?))
}
