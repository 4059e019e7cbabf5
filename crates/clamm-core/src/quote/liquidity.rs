//! # Liquidity Quotes
//!
//! Token amounts for increasing and decreasing a position. Which tokens a
//! position holds depends on where the current tick sits relative to its
//! range:
//!
//! - below the range the position is all token A
//! - above the range it is all token B
//! - inside the range it holds both, split at the current sqrt price
//!
//! Deposits round the derived token amount up; withdrawals round down.

use crate::errors::CoreResult;
use crate::math::big_int::Rounding;
use crate::math::tick_math::sqrt_price_at_tick;
use crate::math::token_math::{
    get_amount_a_delta, get_amount_b_delta, get_liquidity_from_a, get_liquidity_from_b,
};
use crate::types::pool::PoolSnapshot;
use crate::types::position::{PositionSnapshot, PositionStatus, TickRange};
use crate::types::quotes::{
    AddLiquidityQuote, PositionAmounts, RemoveLiquidityQuote, SlippageTolerance, TokenInput,
};

/// Sqrt prices bounding a range
struct RangePrices {
    status: PositionStatus,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
}

impl RangePrices {
    fn new(range: &TickRange, pool: &PoolSnapshot) -> CoreResult<Self> {
        Ok(Self {
            status: range.status(pool.tick_current_index),
            sqrt_price_lower: sqrt_price_at_tick(range.tick_lower_index)?,
            sqrt_price_upper: sqrt_price_at_tick(range.tick_upper_index)?,
        })
    }
}

/// Quote the liquidity minted by depositing `input` into `[tick_lower, tick_upper)`
///
/// `max_token_a`/`max_token_b` are the amounts the deposit may draw;
/// `liquidity` is discounted by `slippage`. A token the range cannot take at
/// the current price yields the zero quote.
pub fn add_liquidity_quote(
    input: TokenInput,
    tick_lower_index: i32,
    tick_upper_index: i32,
    pool: &PoolSnapshot,
    slippage: SlippageTolerance,
) -> CoreResult<AddLiquidityQuote> {
    slippage.validate()?;
    let range = TickRange::new(tick_lower_index, tick_upper_index)?;
    pool.validate()?;

    if input.amount() == 0 {
        return Ok(AddLiquidityQuote::default());
    }

    let prices = RangePrices::new(&range, pool)?;
    let (liquidity, max_token_a, max_token_b) = match (prices.status, input) {
        (PositionStatus::BelowRange, TokenInput::A(amount)) => {
            let liquidity =
                get_liquidity_from_a(amount, prices.sqrt_price_lower, prices.sqrt_price_upper)?;
            (liquidity, amount, 0)
        }
        (PositionStatus::AboveRange, TokenInput::B(amount)) => {
            let liquidity =
                get_liquidity_from_b(amount, prices.sqrt_price_lower, prices.sqrt_price_upper)?;
            (liquidity, 0, amount)
        }
        (PositionStatus::InRange, TokenInput::A(amount)) => {
            let liquidity =
                get_liquidity_from_a(amount, pool.sqrt_price, prices.sqrt_price_upper)?;
            let token_b = get_amount_b_delta(
                prices.sqrt_price_lower,
                pool.sqrt_price,
                liquidity,
                Rounding::Up,
            )?
            .value()?;
            (liquidity, amount, token_b)
        }
        // Sitting exactly on the lower tick price the range has no B side yet
        (PositionStatus::InRange, TokenInput::B(_)) if pool.sqrt_price <= prices.sqrt_price_lower => {
            return Ok(AddLiquidityQuote::default());
        }
        (PositionStatus::InRange, TokenInput::B(amount)) => {
            let liquidity =
                get_liquidity_from_b(amount, prices.sqrt_price_lower, pool.sqrt_price)?;
            let token_a = get_amount_a_delta(
                pool.sqrt_price,
                prices.sqrt_price_upper,
                liquidity,
                Rounding::Up,
            )?
            .value()?;
            (liquidity, token_a, amount)
        }
        (PositionStatus::BelowRange, TokenInput::B(_))
        | (PositionStatus::AboveRange, TokenInput::A(_)) => {
            return Ok(AddLiquidityQuote::default());
        }
    };

    log::trace!(
        "add liquidity quote: status={:?} liquidity={} max_a={} max_b={}",
        prices.status,
        liquidity,
        max_token_a,
        max_token_b
    );

    Ok(AddLiquidityQuote {
        max_token_a,
        max_token_b,
        liquidity: slippage.apply_min_u128(liquidity)?,
    })
}

/// Quote the tokens released by removing `liquidity` from `[tick_lower, tick_upper)`
///
/// Token amounts are rounded down and then discounted by `slippage`.
pub fn remove_liquidity_quote(
    liquidity: u128,
    tick_lower_index: i32,
    tick_upper_index: i32,
    pool: &PoolSnapshot,
    slippage: SlippageTolerance,
) -> CoreResult<RemoveLiquidityQuote> {
    slippage.validate()?;
    let range = TickRange::new(tick_lower_index, tick_upper_index)?;
    pool.validate()?;

    if liquidity == 0 {
        return Ok(RemoveLiquidityQuote::default());
    }

    let amounts = token_amounts(liquidity, &range, pool)?;

    Ok(RemoveLiquidityQuote {
        min_token_a: slippage.apply_min(amounts.token_a)?,
        min_token_b: slippage.apply_min(amounts.token_b)?,
        liquidity,
    })
}

/// Tokens the position would release if fully withdrawn now, before slippage
pub fn estimate_position_amounts(
    position: &PositionSnapshot,
    pool: &PoolSnapshot,
) -> CoreResult<PositionAmounts> {
    let range = position.range()?;
    pool.validate()?;
    if position.liquidity == 0 {
        return Ok(PositionAmounts::default());
    }
    token_amounts(position.liquidity, &range, pool)
}

fn token_amounts(
    liquidity: u128,
    range: &TickRange,
    pool: &PoolSnapshot,
) -> CoreResult<PositionAmounts> {
    let prices = RangePrices::new(range, pool)?;

    let (token_a, token_b) = match prices.status {
        PositionStatus::BelowRange => {
            let token_a = get_amount_a_delta(
                prices.sqrt_price_lower,
                prices.sqrt_price_upper,
                liquidity,
                Rounding::Down,
            )?;
            (token_a.value()?, 0)
        }
        PositionStatus::AboveRange => {
            let token_b = get_amount_b_delta(
                prices.sqrt_price_lower,
                prices.sqrt_price_upper,
                liquidity,
                Rounding::Down,
            )?;
            (0, token_b.value()?)
        }
        PositionStatus::InRange => {
            let token_a =
                get_amount_a_delta(pool.sqrt_price, prices.sqrt_price_upper, liquidity, Rounding::Down)?;
            let token_b =
                get_amount_b_delta(prices.sqrt_price_lower, pool.sqrt_price, liquidity, Rounding::Down)?;
            (token_a.value()?, token_b.value()?)
        }
    };

    Ok(PositionAmounts { token_a, token_b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::errors::CoreError;

    fn pool_at(tick_current_index: i32) -> PoolSnapshot {
        PoolSnapshot {
            sqrt_price: sqrt_price_at_tick(tick_current_index).unwrap(),
            liquidity: 1_000_000,
            tick_current_index,
            tick_spacing: 1,
            fee_rate: 3000,
            ..Default::default()
        }
    }

    #[test]
    fn test_below_range_takes_token_a() {
        let pool = pool_at(-100);
        let quote =
            add_liquidity_quote(TokenInput::A(1000), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote.liquidity, 1_000_049);
        assert_eq!(quote.max_token_a, 1000);
        assert_eq!(quote.max_token_b, 0);

        let quote =
            add_liquidity_quote(TokenInput::B(1000), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote, AddLiquidityQuote::default());
    }

    #[test]
    fn test_above_range_takes_token_b() {
        let pool = pool_at(100);
        let quote =
            add_liquidity_quote(TokenInput::B(1000), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote.liquidity, 1_000_049);
        assert_eq!(quote.max_token_a, 0);
        assert_eq!(quote.max_token_b, 1000);

        let quote =
            add_liquidity_quote(TokenInput::A(1000), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote, AddLiquidityQuote::default());
    }

    #[test]
    fn test_in_range_derives_other_token() {
        let pool = pool_at(0);
        assert_eq!(pool.sqrt_price, Q64);

        let quote =
            add_liquidity_quote(TokenInput::A(500), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote.liquidity, 1_000_300);
        assert_eq!(quote.max_token_a, 500);
        assert_eq!(quote.max_token_b, 500);

        let quote =
            add_liquidity_quote(TokenInput::B(500), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote.liquidity, 1_000_300);
        assert_eq!(quote.max_token_b, 500);
        assert_eq!(quote.max_token_a, 500);
    }

    #[test]
    fn test_slippage_discounts_liquidity() {
        let pool = pool_at(-100);
        let quote = add_liquidity_quote(
            TokenInput::A(1000),
            -10,
            10,
            &pool,
            SlippageTolerance::new(1, 100),
        )
        .unwrap();
        // 1_000_049 * 99 / 100
        assert_eq!(quote.liquidity, 990_048);
        assert_eq!(quote.max_token_a, 1000);
    }

    #[test]
    fn test_zero_amount_and_invalid_inputs() {
        let pool = pool_at(0);
        assert_eq!(
            add_liquidity_quote(TokenInput::A(0), -10, 10, &pool, SlippageTolerance::default())
                .unwrap(),
            AddLiquidityQuote::default()
        );
        assert_eq!(
            add_liquidity_quote(TokenInput::A(1), 10, -10, &pool, SlippageTolerance::default()),
            Err(CoreError::invalid_range(10, -10))
        );
        assert!(matches!(
            add_liquidity_quote(TokenInput::A(1), -10, 10, &pool, SlippageTolerance::new(2, 1)),
            Err(CoreError::InvalidSlippage { .. })
        ));
        assert_eq!(
            remove_liquidity_quote(0, -10, 10, &pool, SlippageTolerance::default()).unwrap(),
            RemoveLiquidityQuote::default()
        );
    }

    #[test]
    fn test_invalid_pool_snapshot() {
        let no_price = PoolSnapshot {
            sqrt_price: 0,
            ..pool_at(0)
        };
        assert_eq!(
            add_liquidity_quote(TokenInput::A(1000), -10, 10, &no_price, SlippageTolerance::zero()),
            Err(CoreError::OutOfRange)
        );
        assert_eq!(
            remove_liquidity_quote(1000, -10, 10, &no_price, SlippageTolerance::zero()),
            Err(CoreError::OutOfRange)
        );

        // the current tick must agree with the price
        let stale_tick = PoolSnapshot {
            tick_current_index: 5,
            ..pool_at(0)
        };
        let position = PositionSnapshot {
            tick_lower_index: -10,
            tick_upper_index: 10,
            liquidity: 1000,
            ..Default::default()
        };
        assert_eq!(
            estimate_position_amounts(&position, &stale_tick),
            Err(CoreError::OutOfRange)
        );

        let zero_spacing = PoolSnapshot {
            tick_spacing: 0,
            ..pool_at(0)
        };
        assert!(matches!(
            add_liquidity_quote(TokenInput::B(1000), -10, 10, &zero_spacing, SlippageTolerance::zero()),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_remove_rounds_down() {
        let pool = pool_at(100);
        let quote = remove_liquidity_quote(1_000_049, -10, 10, &pool, SlippageTolerance::zero())
            .unwrap();
        assert_eq!(quote.min_token_a, 0);
        assert_eq!(quote.min_token_b, 999);
        assert_eq!(quote.liquidity, 1_000_049);
    }

    #[test]
    fn test_lower_tick_price_takes_only_token_a() {
        // On the lower tick the range is in range but holds no token B
        let pool = pool_at(-10);
        let quote =
            add_liquidity_quote(TokenInput::B(1000), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote, AddLiquidityQuote::default());

        let quote =
            add_liquidity_quote(TokenInput::A(1000), -10, 10, &pool, SlippageTolerance::zero())
                .unwrap();
        assert_eq!(quote.liquidity, 1_000_049);
        assert_eq!(quote.max_token_b, 0);
    }

    #[test]
    fn test_estimate_position_amounts() {
        let pool = pool_at(0);
        let position = PositionSnapshot {
            tick_lower_index: -10,
            tick_upper_index: 10,
            liquidity: 1_000_300,
            ..Default::default()
        };
        let amounts = estimate_position_amounts(&position, &pool).unwrap();
        assert_eq!(amounts.token_a, 499);
        assert_eq!(amounts.token_b, 499);

        let empty = PositionSnapshot {
            liquidity: 0,
            ..position
        };
        assert_eq!(
            estimate_position_amounts(&empty, &pool).unwrap(),
            PositionAmounts::default()
        );
    }
}
