//! # CLAMM Core - Off-chain Quoting
//!
//! Quotes for a concentrated-liquidity pool computed from read-only account
//! snapshots, matching the pool program's integer arithmetic and rounding
//! bit for bit:
//!
//! - liquidity quotes for increasing and decreasing a position
//! - swap simulation across initialized ticks and tick arrays
//! - fee and reward quotes for collecting from a position
//!
//! The crate performs no I/O. Tick arrays reach the swap simulator through
//! [`TickArrayAccessor`] or [`AsyncTickArrayAccessor`].
//!
//! ## Feature Flags
//!
//! - `client` (default): serde derives on snapshots, quotes and errors, and
//!   TOML loading for [`QuoteConfig`]

pub mod accessor;
pub mod config;
pub mod constants;
pub mod errors;
pub mod math;
pub mod quote;
pub mod types;

// Re-export commonly used items
pub use accessor::{AsyncTickArrayAccessor, InMemoryTickArrays, TickArrayAccessor};
pub use config::{PartialFillPolicy, QuoteConfig};
pub use constants::*;
pub use errors::{CoreError, CoreResult};
pub use math::big_int::Rounding;
pub use quote::*;
pub use types::*;
