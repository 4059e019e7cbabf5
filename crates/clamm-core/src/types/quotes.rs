//! # Quote Types
//!
//! Requests and results for liquidity, swap and collect quotes.

use crate::constants::{DEFAULT_SLIPPAGE_DENOMINATOR, DEFAULT_SLIPPAGE_NUMERATOR, NUM_REWARDS};
use crate::errors::{CoreError, CoreResult};
use crate::math::big_int::{mul_div_u128, Rounding};
use crate::math::safe_math::safe_cast_u128_to_u64;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Slippage
// ============================================================================

/// Fraction of a quoted amount the caller is willing to lose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct SlippageTolerance {
    pub numerator: u64,
    pub denominator: u64,
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self {
            numerator: DEFAULT_SLIPPAGE_NUMERATOR,
            denominator: DEFAULT_SLIPPAGE_DENOMINATOR,
        }
    }
}

impl SlippageTolerance {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// No tolerance at all
    pub const fn zero() -> Self {
        Self::new(0, 1)
    }

    /// Tolerance in basis points
    pub const fn from_bps(bps: u16) -> Self {
        Self::new(bps as u64, 10_000)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.denominator == 0 || self.numerator > self.denominator {
            return Err(CoreError::InvalidSlippage {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    /// `⌊amount * (den - num) / den⌋`
    pub fn apply_min(&self, amount: u64) -> CoreResult<u64> {
        let min = self.apply_min_u128(amount as u128)?;
        safe_cast_u128_to_u64(min)
    }

    /// `⌊amount * (den - num) / den⌋` for liquidity values
    pub fn apply_min_u128(&self, amount: u128) -> CoreResult<u128> {
        self.validate()?;
        mul_div_u128(
            amount,
            (self.denominator - self.numerator) as u128,
            self.denominator as u128,
            Rounding::Down,
        )
    }

    /// `⌈amount * (den + num) / den⌉`
    pub fn apply_max(&self, amount: u64) -> CoreResult<u64> {
        self.validate()?;
        let max = mul_div_u128(
            amount as u128,
            self.denominator as u128 + self.numerator as u128,
            self.denominator as u128,
            Rounding::Up,
        )?;
        u64::try_from(max).map_err(|_| CoreError::AmountExceedsMax)
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Token amount supplied to a liquidity quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum TokenInput {
    A(u64),
    B(u64),
}

impl TokenInput {
    pub fn amount(&self) -> u64 {
        match self {
            TokenInput::A(amount) | TokenInput::B(amount) => *amount,
        }
    }
}

/// Which token the pool receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum SwapDirection {
    /// Sell token A, price moves down
    AToB,
    /// Sell token B, price moves up
    BToA,
}

impl SwapDirection {
    pub fn is_a_to_b(self) -> bool {
        self == SwapDirection::AToB
    }
}

/// Whether the swap amount fixes the input or the output side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum AmountSpecified {
    Input,
    Output,
}

impl AmountSpecified {
    pub fn is_input(self) -> bool {
        self == AmountSpecified::Input
    }
}

/// A swap to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct SwapRequest {
    pub amount: u64,
    pub specified: AmountSpecified,
    pub direction: SwapDirection,

    /// Price the swap must not cross, defaults to the bound in `direction`
    #[cfg_attr(
        feature = "client",
        serde(default, with = "crate::types::serde_u128::option_u128_string")
    )]
    pub sqrt_price_limit: Option<u128>,
}

impl SwapRequest {
    pub fn exact_input(amount: u64, direction: SwapDirection) -> Self {
        Self {
            amount,
            specified: AmountSpecified::Input,
            direction,
            sqrt_price_limit: None,
        }
    }

    pub fn exact_output(amount: u64, direction: SwapDirection) -> Self {
        Self {
            amount,
            specified: AmountSpecified::Output,
            direction,
            sqrt_price_limit: None,
        }
    }

    pub fn with_sqrt_price_limit(mut self, sqrt_price_limit: u128) -> Self {
        self.sqrt_price_limit = Some(sqrt_price_limit);
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// Token maximums for an increase-liquidity instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct AddLiquidityQuote {
    pub max_token_a: u64,
    pub max_token_b: u64,
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub liquidity: u128,
}

/// Token minimums for a decrease-liquidity instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct RemoveLiquidityQuote {
    pub min_token_a: u64,
    pub min_token_b: u64,
    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub liquidity: u128,
}

/// Token amounts a position currently represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PositionAmounts {
    pub token_a: u64,
    pub token_b: u64,
}

/// Result of a swap simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct SwapQuote {
    pub amount_in: u64,
    pub amount_out: u64,
    pub amount_specified_is_input: bool,
    pub a_to_b: bool,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub sqrt_price_limit: u128,

    /// Minimum output for exact input, maximum input for exact output
    pub other_amount_threshold: u64,

    #[cfg_attr(feature = "client", serde(with = "crate::types::serde_u128::u128_string"))]
    pub estimated_end_sqrt_price: u128,
    pub estimated_end_tick_index: i32,

    /// Total swap fee paid in the input token, protocol share included
    pub estimated_fee_amount: u64,
    pub estimated_protocol_fee: u64,

    /// Specified amount left unfilled
    pub amount_remaining: u64,
    pub tick_arrays_crossed: u8,
    pub is_partial_fill: bool,
}

/// Fees a position can collect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct CollectFeesQuote {
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
}

/// Rewards a position can collect, `None` for unset reward slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct CollectRewardsQuote {
    pub rewards_owed: [Option<u64>; NUM_REWARDS],
}
