//! # Tick Arrays
//!
//! A tick array holds `TICK_ARRAY_SIZE` consecutive initializable ticks
//! starting at `start_tick_index`. The tick at offset `i` has index
//! `start_tick_index + i * tick_spacing`.

use crate::constants::{MAX_TICK, MIN_TICK, TICK_ARRAY_SIZE};
use crate::errors::{CoreError, CoreResult};
use crate::types::tick::{ticks_in_array, Tick};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Result of searching one tick array for an initialized tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSearch {
    /// Index of the initialized tick found
    Found(i32),
    /// No initialized tick in the searched direction; the adjacent array is needed
    Exhausted,
}

/// Snapshot of one tick array account
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TickArray {
    pub start_tick_index: i32,
    pub ticks: Vec<Tick>,
}

impl TickArray {
    /// An array of uninitialized ticks
    pub fn new(start_tick_index: i32) -> Self {
        Self {
            start_tick_index,
            ticks: vec![Tick::default(); TICK_ARRAY_SIZE],
        }
    }

    /// Check length and start alignment for a pool's tick spacing
    pub fn validate(&self, tick_spacing: u16) -> CoreResult<()> {
        if self.ticks.len() != TICK_ARRAY_SIZE {
            return Err(CoreError::InvalidTickArray(format!(
                "expected {} ticks, found {}",
                TICK_ARRAY_SIZE,
                self.ticks.len()
            )));
        }
        if self.start_tick_index.rem_euclid(ticks_in_array(tick_spacing)) != 0 {
            return Err(CoreError::InvalidTickArray(format!(
                "start index {} is not aligned to tick spacing {}",
                self.start_tick_index, tick_spacing
            )));
        }
        Ok(())
    }

    /// First tick index past this array
    pub fn end_tick_index(&self, tick_spacing: u16) -> i32 {
        self.start_tick_index + ticks_in_array(tick_spacing)
    }

    /// Whether `tick_index` falls inside this array's span
    pub fn contains_tick(&self, tick_index: i32, tick_spacing: u16) -> bool {
        tick_index >= self.start_tick_index && tick_index < self.end_tick_index(tick_spacing)
    }

    /// The array holding `MIN_TICK`
    pub fn is_min_tick_array(&self) -> bool {
        self.start_tick_index <= MIN_TICK
    }

    /// The array holding `MAX_TICK`
    pub fn is_max_tick_array(&self, tick_spacing: u16) -> bool {
        self.end_tick_index(tick_spacing) > MAX_TICK
    }

    fn tick_offset(&self, tick_index: i32, tick_spacing: u16) -> CoreResult<usize> {
        let spacing = tick_spacing as i32;
        if !self.contains_tick(tick_index, tick_spacing) {
            return Err(CoreError::OutOfRange);
        }
        if tick_index.rem_euclid(spacing) != 0 {
            return Err(CoreError::InvalidTickArray(format!(
                "tick {} is not a multiple of tick spacing {}",
                tick_index, tick_spacing
            )));
        }
        Ok(((tick_index - self.start_tick_index) / spacing) as usize)
    }

    fn tick_at_offset(&self, offset: usize, tick_spacing: u16) -> i32 {
        self.start_tick_index + offset as i32 * tick_spacing as i32
    }

    /// Tick state at an initializable index within this array
    pub fn get_tick(&self, tick_index: i32, tick_spacing: u16) -> CoreResult<&Tick> {
        let offset = self.tick_offset(tick_index, tick_spacing)?;
        self.ticks
            .get(offset)
            .ok_or_else(|| CoreError::InvalidTickArray("tick array is truncated".to_string()))
    }

    /// Replace the tick state at an initializable index within this array
    pub fn set_tick(&mut self, tick_index: i32, tick_spacing: u16, tick: Tick) -> CoreResult<()> {
        let offset = self.tick_offset(tick_index, tick_spacing)?;
        let slot = self
            .ticks
            .get_mut(offset)
            .ok_or_else(|| CoreError::InvalidTickArray("tick array is truncated".to_string()))?;
        *slot = tick;
        Ok(())
    }

    /// Greatest initialized tick at or below `tick_index` in this array
    pub fn prev_initialized_tick_index(&self, tick_index: i32, tick_spacing: u16) -> TickSearch {
        if tick_index < self.start_tick_index {
            return TickSearch::Exhausted;
        }

        let spacing = tick_spacing as i32;
        let last = self.ticks.len().saturating_sub(1);
        let first_offset = ((tick_index - self.start_tick_index) / spacing) as usize;

        (0..=first_offset.min(last))
            .rev()
            .find(|offset| self.ticks[*offset].initialized)
            .map_or(TickSearch::Exhausted, |offset| {
                TickSearch::Found(self.tick_at_offset(offset, tick_spacing))
            })
    }

    /// Smallest initialized tick strictly above `tick_index` in this array
    pub fn next_initialized_tick_index(&self, tick_index: i32, tick_spacing: u16) -> TickSearch {
        let spacing = tick_spacing as i32;
        let first_offset = if tick_index < self.start_tick_index {
            0
        } else {
            ((tick_index - self.start_tick_index) / spacing) as usize + 1
        };

        (first_offset..self.ticks.len())
            .find(|offset| self.ticks[*offset].initialized)
            .map_or(TickSearch::Exhausted, |offset| {
                TickSearch::Found(self.tick_at_offset(offset, tick_spacing))
            })
    }
}
