//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::path::PathBuf;

use clamm_core::{InMemoryTickArrays, PoolSnapshot, PositionSnapshot, Tick, TickArray, Q64};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_fixture<T: DeserializeOwned>(name: &str) -> T {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {}", path.display(), e))
}

/// Tick array listing only its initialized ticks
#[derive(Debug, Deserialize)]
pub struct SparseTickArray {
    pub start_tick_index: i32,
    pub ticks: Vec<SparseTick>,
}

#[derive(Debug, Deserialize)]
pub struct SparseTick {
    pub tick_index: i32,
    pub tick: Tick,
}

impl SparseTickArray {
    pub fn into_tick_array(self, tick_spacing: u16) -> TickArray {
        let mut tick_array = TickArray::new(self.start_tick_index);
        for entry in self.ticks {
            tick_array
                .set_tick(entry.tick_index, tick_spacing, entry.tick)
                .expect("fixture tick outside its array");
        }
        tick_array
    }
}

/// Pool, position and the tick arrays around them
#[derive(Debug, Deserialize)]
pub struct PositionFixture {
    pub pool: PoolSnapshot,
    pub position: PositionSnapshot,
    pub tick_arrays: Vec<SparseTickArray>,
}

impl PositionFixture {
    pub fn accessor(self) -> (PoolSnapshot, PositionSnapshot, InMemoryTickArrays) {
        let tick_spacing = self.pool.tick_spacing;
        let arrays = self
            .tick_arrays
            .into_iter()
            .map(|sparse| sparse.into_tick_array(tick_spacing))
            .collect();
        (self.pool, self.position, arrays)
    }
}

// ============================================================================
// Swap Fixtures
// ============================================================================

/// Expected outcome of a swap against [`dense_tick_arrays`]
#[derive(Debug, Deserialize)]
pub struct SwapVector {
    pub liquidity: u128,
    pub a_to_b: bool,
    pub exact_input: bool,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee: u64,
    #[serde(with = "clamm_core::types::serde_u128::u128_string")]
    pub end_sqrt_price: u128,
    pub end_tick: i32,
    pub end_liquidity: u128,
    pub tick_arrays_crossed: u8,
    pub other_amount_threshold: u64,
}

pub const SWAP_TICK_SPACING: u16 = 2;

pub const SWAP_ARRAY_STARTS: [i32; 5] = [-352, -176, 0, 176, 352];

/// Pool at price 1.0 with spacing 2 and a 0.3% fee
pub fn swap_pool(liquidity: u128) -> PoolSnapshot {
    PoolSnapshot {
        sqrt_price: Q64,
        liquidity,
        tick_current_index: 0,
        tick_spacing: SWAP_TICK_SPACING,
        fee_rate: 3000,
        ..Default::default()
    }
}

/// Every tick initialized: +1000 net below zero, -1000 from zero up
pub fn dense_tick_array(start_tick_index: i32) -> TickArray {
    let liquidity_net = if start_tick_index < 0 { 1000 } else { -1000 };
    let mut tick_array = TickArray::new(start_tick_index);
    for tick in tick_array.ticks.iter_mut() {
        *tick = Tick::with_liquidity_net(liquidity_net);
    }
    tick_array
}

pub fn dense_tick_arrays() -> InMemoryTickArrays {
    SWAP_ARRAY_STARTS.iter().map(|start| dense_tick_array(*start)).collect()
}

/// Arrays without any initialized tick
pub fn empty_tick_arrays(starts: impl IntoIterator<Item = i32>) -> InMemoryTickArrays {
    starts.into_iter().map(TickArray::new).collect()
}
