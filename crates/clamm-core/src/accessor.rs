//! Tick array access ports
//!
//! The swap simulator never fetches accounts itself. Hosts hand it tick
//! arrays through one of these traits, keyed by array start index.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::types::tick_array::TickArray;

/// Synchronous tick array source
pub trait TickArrayAccessor {
    /// Tick array starting at `start_tick_index`, `None` when unavailable
    fn fetch_tick_array(&self, start_tick_index: i32) -> Option<Arc<TickArray>>;
}

/// Asynchronous tick array source, e.g. an RPC-backed account cache
#[async_trait]
pub trait AsyncTickArrayAccessor: Send + Sync {
    /// Tick array starting at `start_tick_index`, `None` when unavailable
    async fn fetch_tick_array(&self, start_tick_index: i32) -> Option<Arc<TickArray>>;
}

/// Tick arrays held in memory, keyed by start index
#[derive(Debug, Clone, Default)]
pub struct InMemoryTickArrays {
    arrays: HashMap<i32, Arc<TickArray>>,
}

impl InMemoryTickArrays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the array at its start index
    pub fn insert(&mut self, tick_array: TickArray) -> Option<Arc<TickArray>> {
        self.arrays
            .insert(tick_array.start_tick_index, Arc::new(tick_array))
    }

    pub fn remove(&mut self, start_tick_index: i32) -> Option<Arc<TickArray>> {
        self.arrays.remove(&start_tick_index)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Start indexes of all held arrays, ascending
    pub fn start_indexes(&self) -> Vec<i32> {
        let mut starts: Vec<i32> = self.arrays.keys().copied().collect();
        starts.sort_unstable();
        starts
    }
}

impl FromIterator<TickArray> for InMemoryTickArrays {
    fn from_iter<I: IntoIterator<Item = TickArray>>(iter: I) -> Self {
        let mut arrays = Self::new();
        for tick_array in iter {
            arrays.insert(tick_array);
        }
        arrays
    }
}

impl TickArrayAccessor for InMemoryTickArrays {
    fn fetch_tick_array(&self, start_tick_index: i32) -> Option<Arc<TickArray>> {
        self.arrays.get(&start_tick_index).cloned()
    }
}

#[async_trait]
impl AsyncTickArrayAccessor for InMemoryTickArrays {
    async fn fetch_tick_array(&self, start_tick_index: i32) -> Option<Arc<TickArray>> {
        self.arrays.get(&start_tick_index).cloned()
    }
}
