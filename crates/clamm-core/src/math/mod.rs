//! # Mathematical Functions
//!
//! Exact integer math shared by every quote path, plus display-only price
//! conversions in [`fixed_point`].

pub mod big_int;
pub mod fee_math;
pub mod fixed_point;
pub mod safe_math;
pub mod tick_math;
pub mod token_math;

// Re-export commonly used functions
pub use big_int::*;
pub use fee_math::*;
pub use fixed_point::*;
pub use safe_math::*;
pub use tick_math::*;
pub use token_math::*;
