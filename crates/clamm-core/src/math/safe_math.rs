//! # Safe Math Operations
//!
//! Overflow-checked arithmetic for amounts and liquidity, plus the wrapping
//! helpers for growth accumulators, which the pool program defines modulo 2^128.

use crate::errors::{CoreError, CoreResult};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Division operations with zero check
    (div, $fn_name:ident, $type:ty) => {
        #[doc = concat!("Division on `", stringify!($type), "` with zero check")]
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            if b == 0 {
                return Err(CoreError::DivideByZero);
            }
            Ok(a / b)
        }
    };

    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident, $error:expr) => {
        #[doc = concat!("Checked `", stringify!($checked_method), "` on `", stringify!($type), "`")]
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            a.$checked_method(b).ok_or($error)
        }
    };
}

// Token amounts
safe_arith!(safe_add_u64, u64, checked_add, CoreError::ArithmeticOverflow);
safe_arith!(safe_sub_u64, u64, checked_sub, CoreError::ArithmeticUnderflow);

// Liquidity and Q64.64 values
safe_arith!(safe_add_u128, u128, checked_add, CoreError::ArithmeticOverflow);
safe_arith!(safe_sub_u128, u128, checked_sub, CoreError::ArithmeticUnderflow);
safe_arith!(safe_mul_u128, u128, checked_mul, CoreError::ArithmeticOverflow);
safe_arith!(div, safe_div_u128, u128);

/// Narrow a u128 amount to a u64 token amount
pub fn safe_cast_u128_to_u64(value: u128) -> CoreResult<u64> {
    u64::try_from(value).map_err(|_| CoreError::AmountExceedsMax)
}

/// Apply a signed liquidity delta
pub fn add_liquidity_delta(liquidity: u128, delta: i128) -> CoreResult<u128> {
    if delta >= 0 {
        safe_add_u128(liquidity, delta.unsigned_abs())
    } else {
        safe_sub_u128(liquidity, delta.unsigned_abs())
    }
}

/// Growth accumulator addition (wraps modulo 2^128)
pub const fn add_growth(growth: u128, delta: u128) -> u128 {
    growth.wrapping_add(delta)
}

/// Growth accumulator difference (wraps modulo 2^128)
pub const fn sub_growth(growth: u128, other: u128) -> u128 {
    growth.wrapping_sub(other)
}
