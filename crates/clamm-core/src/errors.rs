//! # Core Error Types
//!
//! Every failure the quoting core can report. Errors are returned to the
//! caller immediately; the core never retries and never substitutes a value.

use thiserror::Error;

/// Errors produced by the quoting core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
pub enum CoreError {
    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Arithmetic underflow")]
    ArithmeticUnderflow,

    #[error("Division by zero")]
    DivideByZero,

    #[error("Token amount exceeds u64::MAX")]
    AmountExceedsMax,

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Tick or sqrt price out of range")]
    OutOfRange,

    #[error("Swap would move the sqrt price out of bounds")]
    OutOfBounds,

    #[error("Invalid tick range: lower {lower} must be below upper {upper}")]
    InvalidRange { lower: i32, upper: i32 },

    #[error("Invalid slippage tolerance {numerator}/{denominator}")]
    InvalidSlippage { numerator: u64, denominator: u64 },

    #[error("Invalid sqrt price limit")]
    InvalidSqrtPriceLimit,

    #[error("Swap amount must be greater than zero")]
    ZeroTradableAmount,

    #[error("Invalid tick array: {0}")]
    InvalidTickArray(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Snapshot Errors
    // ========================================================================

    #[error("Tick array starting at {start_tick_index} is stale or missing")]
    StaleOrMissingData { start_tick_index: i32 },

    #[error("Swap needs more than {max_crossings} tick array crossings")]
    TickArrayBudgetExceeded { max_crossings: u8 },
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid range error
    pub fn invalid_range(lower: i32, upper: i32) -> Self {
        Self::InvalidRange { lower, upper }
    }

    /// Create a stale or missing tick array error
    pub fn stale_tick_array(start_tick_index: i32) -> Self {
        Self::StaleOrMissingData { start_tick_index }
    }

    /// Create an invalid configuration error with reason
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}
