//! # Protocol Constants
//!
//! Fixed-point scales, tick and price bounds, fee denominators and the
//! defaults used when a caller does not configure a quote explicitly.

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Q64 fixed-point scale factor: 2^64
pub const Q64: u128 = 1u128 << 64;

/// Number of fractional bits in a Q64.64 value
pub const Q64_RESOLUTION: u32 = 64;

/// Mask selecting the fractional half of a Q64.64 value
pub const Q64_MASK: u128 = 0xFFFF_FFFF_FFFF_FFFF;

// ============================================================================
// Tick and Price Bounds
// ============================================================================

/// Lowest tick index supported by the pool program
pub const MIN_TICK: i32 = -443636;

/// Highest tick index supported by the pool program
pub const MAX_TICK: i32 = 443636;

/// sqrt price at `MIN_TICK` in Q64.64
pub const MIN_SQRT_PRICE: u128 = 4295048016;

/// sqrt price at `MAX_TICK` in Q64.64
pub const MAX_SQRT_PRICE: u128 = 79226673515401279992447579055;

/// Number of ticks stored in a single tick array account
pub const TICK_ARRAY_SIZE: usize = 88;

/// Number of reward slots tracked per pool and per position
pub const NUM_REWARDS: usize = 3;

// ============================================================================
// Fee Parameters
// ============================================================================

/// Fee and protocol fee rates are expressed in parts per million
pub const FEE_RATE_MUL_VALUE: u128 = 1_000_000;

/// Largest accepted swap fee rate (100%)
pub const MAX_FEE_RATE: u32 = 1_000_000;

/// Largest accepted protocol fee rate (100% of the swap fee)
pub const MAX_PROTOCOL_FEE_RATE: u32 = 1_000_000;

// ============================================================================
// Quote Defaults
// ============================================================================

/// Default slippage tolerance numerator (0.1%)
pub const DEFAULT_SLIPPAGE_NUMERATOR: u64 = 1;

/// Default slippage tolerance denominator
pub const DEFAULT_SLIPPAGE_DENOMINATOR: u64 = 1_000;

/// Tick arrays a swap may move into beyond the one holding the current tick
pub const DEFAULT_MAX_TICK_ARRAY_CROSSINGS: u8 = 2;
