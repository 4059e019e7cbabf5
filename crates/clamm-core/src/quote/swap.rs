//! # Swap Simulation
//!
//! Replays the pool program's swap loop off-chain. Each step moves the price
//! toward the next initialized tick (or the price limit), charges the swap
//! fee and, when the tick is reached, crosses it and updates active
//! liquidity.
//!
//! The simulation is a resumable state machine: [`SwapSimulation::advance`]
//! runs steps until a tick array is needed or the swap is complete, so the
//! same loop serves both [`simulate_swap`] and [`simulate_swap_async`].
//!
//! Tick arrays are visited in swap direction starting from the array holding
//! the current tick (for B to A, the tick one spacing above it). Moving past
//! the last array allowed by `max_tick_array_crossings` ends the swap at that
//! array's boundary as a partial fill.

use std::sync::Arc;

use crate::accessor::{AsyncTickArrayAccessor, TickArrayAccessor};
use crate::config::{PartialFillPolicy, QuoteConfig};
use crate::constants::{FEE_RATE_MUL_VALUE, MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK};
use crate::errors::{CoreError, CoreResult};
use crate::math::big_int::{mul_div_u128, Rounding};
use crate::math::fee_math::{calculate_fee_growth, calculate_protocol_fee};
use crate::math::safe_math::{
    add_growth, add_liquidity_delta, safe_add_u64, safe_cast_u128_to_u64, safe_sub_u64,
};
use crate::math::tick_math::{sqrt_price_at_tick, tick_at_sqrt_price};
use crate::math::token_math::{
    get_amount_a_delta, get_amount_b_delta, get_next_sqrt_price_from_a_round_up,
    get_next_sqrt_price_from_b_round_down, AmountDelta,
};
use crate::types::pool::PoolSnapshot;
use crate::types::quotes::{AmountSpecified, SwapDirection, SwapQuote, SwapRequest};
use crate::types::tick::{tick_array_start_index, ticks_in_array};
use crate::types::tick_array::{TickArray, TickSearch};

// ============================================================================
// Swap Step
// ============================================================================

/// Token whose amount the request fixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixedToken {
    A,
    B,
}

impl FixedToken {
    fn of(direction: SwapDirection, specified: AmountSpecified) -> Self {
        match (direction, specified) {
            (SwapDirection::AToB, AmountSpecified::Input)
            | (SwapDirection::BToA, AmountSpecified::Output) => FixedToken::A,
            (SwapDirection::AToB, AmountSpecified::Output)
            | (SwapDirection::BToA, AmountSpecified::Input) => FixedToken::B,
        }
    }
}

/// Result of one swap step within a single liquidity range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub amount_in: u64,
    pub amount_out: u64,
    pub sqrt_price_next: u128,
    pub fee_amount: u64,
}

/// Move from `sqrt_price_current` toward `sqrt_price_target` with constant liquidity
///
/// Input amounts round up and output amounts round down. For exact input the
/// fee is taken out of `amount_remaining` before the price moves.
pub fn compute_swap_step(
    amount_remaining: u64,
    fee_rate: u32,
    liquidity: u128,
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    direction: SwapDirection,
    specified: AmountSpecified,
) -> CoreResult<SwapStep> {
    if fee_rate as u128 >= FEE_RATE_MUL_VALUE {
        return Err(CoreError::invalid_config(format!("fee rate {} out of range", fee_rate)));
    }

    let fixed_token = FixedToken::of(direction, specified);
    let is_input = specified.is_input();

    let initial_fixed_delta =
        fixed_delta(fixed_token, is_input, sqrt_price_current, sqrt_price_target, liquidity)?;

    let amount_calculated = if is_input {
        mul_div_u128(
            amount_remaining as u128,
            FEE_RATE_MUL_VALUE - fee_rate as u128,
            FEE_RATE_MUL_VALUE,
            Rounding::Down,
        )? as u64
    } else {
        amount_remaining
    };

    let sqrt_price_next = if initial_fixed_delta.lte(amount_calculated) {
        sqrt_price_target
    } else {
        next_sqrt_price(
            fixed_token,
            is_input,
            sqrt_price_current,
            liquidity,
            amount_calculated,
        )?
    };

    let is_max_swap = sqrt_price_next == sqrt_price_target;

    let amount_unfixed =
        unfixed_delta(fixed_token, is_input, sqrt_price_current, sqrt_price_next, liquidity)?
            .value()?;

    // Stopping short of the target changes the fixed amount actually used
    let amount_fixed = if !is_max_swap || initial_fixed_delta.exceeds_max() {
        fixed_delta(fixed_token, is_input, sqrt_price_current, sqrt_price_next, liquidity)?
            .value()?
    } else {
        initial_fixed_delta.value()?
    };

    let (amount_in, mut amount_out) = if is_input {
        (amount_fixed, amount_unfixed)
    } else {
        (amount_unfixed, amount_fixed)
    };

    if !is_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if is_input && !is_max_swap {
        safe_sub_u64(amount_remaining, amount_in)?
    } else {
        let fee = mul_div_u128(
            amount_in as u128,
            fee_rate as u128,
            FEE_RATE_MUL_VALUE - fee_rate as u128,
            Rounding::Up,
        )?;
        safe_cast_u128_to_u64(fee)?
    };

    Ok(SwapStep {
        amount_in,
        amount_out,
        sqrt_price_next,
        fee_amount,
    })
}

/// Amount of the fixed token: rounded up when paid in, down when paid out
fn fixed_delta(
    fixed_token: FixedToken,
    is_input: bool,
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
) -> CoreResult<AmountDelta> {
    let rounding = Rounding::up_if(is_input);
    match fixed_token {
        FixedToken::A => get_amount_a_delta(sqrt_price_0, sqrt_price_1, liquidity, rounding),
        FixedToken::B => get_amount_b_delta(sqrt_price_0, sqrt_price_1, liquidity, rounding),
    }
}

/// Amount of the other token: rounded down when received, up when paid
fn unfixed_delta(
    fixed_token: FixedToken,
    is_input: bool,
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
) -> CoreResult<AmountDelta> {
    let rounding = Rounding::up_if(!is_input);
    match fixed_token {
        FixedToken::A => get_amount_b_delta(sqrt_price_0, sqrt_price_1, liquidity, rounding),
        FixedToken::B => get_amount_a_delta(sqrt_price_0, sqrt_price_1, liquidity, rounding),
    }
}

fn next_sqrt_price(
    fixed_token: FixedToken,
    is_input: bool,
    sqrt_price: u128,
    liquidity: u128,
    amount: u64,
) -> CoreResult<u128> {
    match fixed_token {
        FixedToken::A => get_next_sqrt_price_from_a_round_up(sqrt_price, liquidity, amount, is_input),
        FixedToken::B => {
            get_next_sqrt_price_from_b_round_down(sqrt_price, liquidity, amount, is_input)
        }
    }
}

// ============================================================================
// Simulation State
// ============================================================================

/// Call-scoped swap state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapState {
    pub sqrt_price: u128,
    pub tick_index: i32,
    pub liquidity: u128,
    pub amount_remaining: u64,
    pub amount_calculated: u64,
    pub fee_amount: u64,
    pub protocol_fee: u64,
    /// Fee growth of the input token after the swap, Q64.64
    pub fee_growth_global_input: u128,
    pub tick_arrays_crossed: u8,
}

/// Where the simulation stands after [`SwapSimulation::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapProgress {
    /// Supply the tick array starting at this index to continue
    NeedsTickArray { start_tick_index: i32 },
    /// The swap is done; call [`SwapSimulation::into_quote`]
    Complete,
}

/// Tick a step moves toward
#[derive(Debug, Clone, Copy)]
struct StepTarget {
    tick_index: i32,
    initialized: bool,
    /// Last tick reachable within the tick array budget
    budget_boundary: bool,
}

/// A swap simulation that pauses whenever it needs another tick array
#[derive(Debug, Clone)]
pub struct SwapSimulation {
    request: SwapRequest,
    config: QuoteConfig,
    tick_spacing: u16,
    fee_rate: u32,
    protocol_fee_rate: u32,
    sqrt_price_limit: u128,
    state: SwapState,
    tick_array_start_index: i32,
    tick_array: Option<Arc<TickArray>>,
    pending_start_index: Option<i32>,
    is_partial_fill: bool,
    complete: bool,
}

impl SwapSimulation {
    /// Validate the request against the pool and prepare the initial state
    pub fn new(pool: &PoolSnapshot, request: SwapRequest, config: QuoteConfig) -> CoreResult<Self> {
        pool.validate()?;
        config.validate()?;

        if request.amount == 0 {
            return Err(CoreError::ZeroTradableAmount);
        }

        let a_to_b = request.direction.is_a_to_b();
        let sqrt_price_limit = request.sqrt_price_limit.unwrap_or(if a_to_b {
            MIN_SQRT_PRICE
        } else {
            MAX_SQRT_PRICE
        });

        if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price_limit) {
            return Err(CoreError::InvalidSqrtPriceLimit);
        }
        if a_to_b && sqrt_price_limit >= pool.sqrt_price
            || !a_to_b && sqrt_price_limit <= pool.sqrt_price
        {
            return Err(CoreError::InvalidSqrtPriceLimit);
        }

        // B to A looks for ticks strictly above the current one
        let search_tick = if a_to_b {
            pool.tick_current_index
        } else {
            pool.tick_current_index + pool.tick_spacing as i32
        };

        let fee_growth_global_input = if a_to_b {
            pool.fee_growth_global_a
        } else {
            pool.fee_growth_global_b
        };

        log::debug!(
            "swap simulation: {:?} {:?} amount={} limit={} tick={}",
            request.direction,
            request.specified,
            request.amount,
            sqrt_price_limit,
            pool.tick_current_index
        );

        Ok(Self {
            request,
            config,
            tick_spacing: pool.tick_spacing,
            fee_rate: pool.fee_rate,
            protocol_fee_rate: pool.protocol_fee_rate,
            sqrt_price_limit,
            state: SwapState {
                sqrt_price: pool.sqrt_price,
                tick_index: pool.tick_current_index,
                liquidity: pool.liquidity,
                amount_remaining: request.amount,
                amount_calculated: 0,
                fee_amount: 0,
                protocol_fee: 0,
                fee_growth_global_input,
                tick_arrays_crossed: 0,
            },
            tick_array_start_index: tick_array_start_index(search_tick, pool.tick_spacing),
            tick_array: None,
            pending_start_index: None,
            is_partial_fill: false,
            complete: false,
        })
    }

    pub fn state(&self) -> &SwapState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Run swap steps until a tick array is needed or the swap completes
    pub fn advance(&mut self) -> CoreResult<SwapProgress> {
        loop {
            if self.complete {
                return Ok(SwapProgress::Complete);
            }
            if let Some(start_tick_index) = self.pending_start_index {
                return Ok(SwapProgress::NeedsTickArray { start_tick_index });
            }
            if self.state.amount_remaining == 0 || self.state.sqrt_price == self.sqrt_price_limit {
                self.complete = true;
                continue;
            }

            let tick_array = match &self.tick_array {
                Some(tick_array) => Arc::clone(tick_array),
                None => {
                    self.pending_start_index = Some(self.tick_array_start_index);
                    continue;
                }
            };

            let target = match self.next_target(&tick_array) {
                Some(target) => target,
                None => {
                    self.move_to_next_tick_array();
                    continue;
                }
            };

            self.step_to(target, &tick_array)?;

            if self.is_partial_fill {
                log::debug!(
                    "swap stopped at tick array budget: crossed={} remaining={}",
                    self.state.tick_arrays_crossed,
                    self.state.amount_remaining
                );
                if self.config.partial_fill == PartialFillPolicy::Reject {
                    return Err(CoreError::TickArrayBudgetExceeded {
                        max_crossings: self.config.max_tick_array_crossings,
                    });
                }
                self.complete = true;
            }
        }
    }

    /// Install the tick array requested by the last [`SwapProgress::NeedsTickArray`]
    ///
    /// `None`, an array with a different start index or a malformed array is
    /// reported as `StaleOrMissingData`.
    pub fn supply_tick_array(&mut self, tick_array: Option<Arc<TickArray>>) -> CoreResult<()> {
        let start_tick_index = self
            .pending_start_index
            .ok_or_else(|| CoreError::InvalidTickArray("no tick array was requested".to_string()))?;

        let tick_array = tick_array.ok_or(CoreError::stale_tick_array(start_tick_index))?;
        if tick_array.start_tick_index != start_tick_index
            || tick_array.validate(self.tick_spacing).is_err()
        {
            return Err(CoreError::stale_tick_array(start_tick_index));
        }

        log::trace!("tick array supplied: start={}", start_tick_index);

        self.tick_array = Some(tick_array);
        self.pending_start_index = None;
        Ok(())
    }

    /// Assemble the quote of a completed simulation
    pub fn into_quote(self) -> CoreResult<SwapQuote> {
        if !self.complete {
            let start_tick_index = self
                .pending_start_index
                .unwrap_or(self.tick_array_start_index);
            return Err(CoreError::stale_tick_array(start_tick_index));
        }

        let amount_specified_is_input = self.request.specified.is_input();
        let amount_filled = safe_sub_u64(self.request.amount, self.state.amount_remaining)?;

        let (amount_in, amount_out, other_amount_threshold) = if amount_specified_is_input {
            let amount_out = self.state.amount_calculated;
            let min_out = self.config.slippage.apply_min(amount_out)?;
            (amount_filled, amount_out, min_out)
        } else {
            let amount_in = self.state.amount_calculated;
            let max_in = self.config.slippage.apply_max(amount_in)?;
            (amount_in, amount_filled, max_in)
        };

        log::debug!(
            "swap quote: in={} out={} fee={} end_tick={} crossed={} partial={}",
            amount_in,
            amount_out,
            self.state.fee_amount,
            self.state.tick_index,
            self.state.tick_arrays_crossed,
            self.is_partial_fill
        );

        Ok(SwapQuote {
            amount_in,
            amount_out,
            amount_specified_is_input,
            a_to_b: self.request.direction.is_a_to_b(),
            sqrt_price_limit: self.sqrt_price_limit,
            other_amount_threshold,
            estimated_end_sqrt_price: self.state.sqrt_price,
            estimated_end_tick_index: self.state.tick_index,
            estimated_fee_amount: self.state.fee_amount,
            estimated_protocol_fee: self.state.protocol_fee,
            amount_remaining: self.state.amount_remaining,
            tick_arrays_crossed: self.state.tick_arrays_crossed,
            is_partial_fill: self.is_partial_fill,
        })
    }

    /// Next tick to move toward in the current array, `None` to fetch the adjacent one
    fn next_target(&self, tick_array: &TickArray) -> Option<StepTarget> {
        let a_to_b = self.request.direction.is_a_to_b();
        let search = if a_to_b {
            tick_array.prev_initialized_tick_index(self.state.tick_index, self.tick_spacing)
        } else {
            tick_array.next_initialized_tick_index(self.state.tick_index, self.tick_spacing)
        };

        if let TickSearch::Found(tick_index) = search {
            return Some(StepTarget {
                tick_index,
                initialized: true,
                budget_boundary: false,
            });
        }

        if a_to_b && tick_array.is_min_tick_array() {
            return Some(StepTarget {
                tick_index: MIN_TICK,
                initialized: false,
                budget_boundary: false,
            });
        }
        if !a_to_b && tick_array.is_max_tick_array(self.tick_spacing) {
            return Some(StepTarget {
                tick_index: MAX_TICK,
                initialized: false,
                budget_boundary: false,
            });
        }

        if self.state.tick_arrays_crossed >= self.config.max_tick_array_crossings {
            let tick_index = if a_to_b {
                tick_array.start_tick_index
            } else {
                tick_array.end_tick_index(self.tick_spacing) - 1
            };
            return Some(StepTarget {
                tick_index,
                initialized: false,
                budget_boundary: true,
            });
        }

        None
    }

    fn move_to_next_tick_array(&mut self) {
        let span = ticks_in_array(self.tick_spacing);
        self.tick_array_start_index += if self.request.direction.is_a_to_b() {
            -span
        } else {
            span
        };
        self.state.tick_arrays_crossed += 1;
        self.tick_array = None;

        log::trace!(
            "moving to tick array {} (crossed {})",
            self.tick_array_start_index,
            self.state.tick_arrays_crossed
        );
    }

    fn step_to(&mut self, target: StepTarget, tick_array: &TickArray) -> CoreResult<()> {
        let a_to_b = self.request.direction.is_a_to_b();
        let is_input = self.request.specified.is_input();

        let tick_sqrt_price = sqrt_price_at_tick(target.tick_index)?;
        let sqrt_price_target = if a_to_b {
            tick_sqrt_price.max(self.sqrt_price_limit)
        } else {
            tick_sqrt_price.min(self.sqrt_price_limit)
        };

        let step = compute_swap_step(
            self.state.amount_remaining,
            self.fee_rate,
            self.state.liquidity,
            self.state.sqrt_price,
            sqrt_price_target,
            self.request.direction,
            self.request.specified,
        )?;

        log::trace!(
            "swap step: target_tick={} in={} out={} fee={} next_price={}",
            target.tick_index,
            step.amount_in,
            step.amount_out,
            step.fee_amount,
            step.sqrt_price_next
        );

        if is_input {
            let consumed = safe_add_u64(step.amount_in, step.fee_amount)?;
            self.state.amount_remaining = safe_sub_u64(self.state.amount_remaining, consumed)?;
            self.state.amount_calculated =
                safe_add_u64(self.state.amount_calculated, step.amount_out)?;
        } else {
            self.state.amount_remaining =
                safe_sub_u64(self.state.amount_remaining, step.amount_out)?;
            let paid = safe_add_u64(step.amount_in, step.fee_amount)?;
            self.state.amount_calculated = safe_add_u64(self.state.amount_calculated, paid)?;
        }

        let protocol_fee = calculate_protocol_fee(step.fee_amount, self.protocol_fee_rate);
        self.state.protocol_fee = safe_add_u64(self.state.protocol_fee, protocol_fee)?;
        self.state.fee_amount = safe_add_u64(self.state.fee_amount, step.fee_amount)?;

        // Growth uses the liquidity the step traded against, before any crossing
        if self.state.liquidity > 0 {
            let growth = calculate_fee_growth(step.fee_amount - protocol_fee, self.state.liquidity)?;
            self.state.fee_growth_global_input =
                add_growth(self.state.fee_growth_global_input, growth);
        }

        if step.sqrt_price_next == tick_sqrt_price {
            if target.initialized {
                self.cross_tick(target.tick_index, tick_array)?;
            }
            self.state.tick_index = if a_to_b {
                target.tick_index - 1
            } else {
                target.tick_index
            };
            if target.budget_boundary && self.state.amount_remaining > 0 {
                self.is_partial_fill = true;
            }
        } else if step.sqrt_price_next != self.state.sqrt_price {
            self.state.tick_index = tick_at_sqrt_price(step.sqrt_price_next)?;
        }

        self.state.sqrt_price = step.sqrt_price_next;
        Ok(())
    }

    fn cross_tick(&mut self, tick_index: i32, tick_array: &TickArray) -> CoreResult<()> {
        let tick = tick_array.get_tick(tick_index, self.tick_spacing)?;

        // Moving down crosses the tick in reverse
        let liquidity_delta = if self.request.direction.is_a_to_b() {
            tick.liquidity_net
                .checked_neg()
                .ok_or(CoreError::ArithmeticOverflow)?
        } else {
            tick.liquidity_net
        };

        self.state.liquidity = add_liquidity_delta(self.state.liquidity, liquidity_delta)?;

        log::trace!(
            "crossed tick {}: liquidity_net={} liquidity={}",
            tick_index,
            tick.liquidity_net,
            self.state.liquidity
        );
        Ok(())
    }
}

// ============================================================================
// Drivers
// ============================================================================

/// Simulate a swap, fetching tick arrays synchronously
pub fn simulate_swap<A: TickArrayAccessor + ?Sized>(
    pool: &PoolSnapshot,
    request: SwapRequest,
    config: QuoteConfig,
    accessor: &A,
) -> CoreResult<SwapQuote> {
    let mut simulation = SwapSimulation::new(pool, request, config)?;
    loop {
        match simulation.advance()? {
            SwapProgress::NeedsTickArray { start_tick_index } => {
                simulation.supply_tick_array(accessor.fetch_tick_array(start_tick_index))?;
            }
            SwapProgress::Complete => return simulation.into_quote(),
        }
    }
}

/// Simulate a swap, awaiting each tick array lookup
pub async fn simulate_swap_async<A: AsyncTickArrayAccessor + ?Sized>(
    pool: &PoolSnapshot,
    request: SwapRequest,
    config: QuoteConfig,
    accessor: &A,
) -> CoreResult<SwapQuote> {
    let mut simulation = SwapSimulation::new(pool, request, config)?;
    loop {
        match simulation.advance()? {
            SwapProgress::NeedsTickArray { start_tick_index } => {
                let tick_array = accessor.fetch_tick_array(start_tick_index).await;
                simulation.supply_tick_array(tick_array)?;
            }
            SwapProgress::Complete => return simulation.into_quote(),
        }
    }
}
