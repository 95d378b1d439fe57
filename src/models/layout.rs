//! Block layout: the daily block numbering and its split into shifts.
//!
//! Blocks are numbered from 1. The morning shift owns `1..=morning_end`,
//! the afternoon shift owns `afternoon_start..=total_blocks`. The two ranges
//! may share a boundary block (`morning_end == afternoon_start`), which is
//! the usual configuration: the last morning block doubles as the first
//! afternoon block.

use serde::{Deserialize, Serialize};

use super::{EngineConfig, Shift};
use crate::error::{ScheduleError, ScheduleResult};

/// Block number within a day (1-based).
pub type Block = u32;

/// An inclusive range of blocks `[first, last]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    /// First block (inclusive).
    pub first: Block,
    /// Last block (inclusive).
    pub last: Block,
}

impl BlockRange {
    /// Creates a new range.
    pub fn new(first: Block, last: Block) -> Self {
        Self { first, last }
    }

    /// Range of `length` blocks starting at `start`.
    ///
    /// `length` must be at least 1.
    pub fn starting_at(start: Block, length: u32) -> Self {
        Self::new(start, start + length.max(1) - 1)
    }

    /// Number of blocks in the range.
    #[inline]
    pub fn len(&self) -> u32 {
        if self.last < self.first {
            0
        } else {
            self.last - self.first + 1
        }
    }

    /// Whether the range holds no blocks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a block falls within this range.
    #[inline]
    pub fn contains(&self, block: Block) -> bool {
        block >= self.first && block <= self.last
    }

    /// Whether `other` lies entirely within this range.
    pub fn covers(&self, other: &Self) -> bool {
        self.contains(other.first) && self.contains(other.last)
    }

    /// Blocks in ascending order.
    pub fn blocks(&self) -> impl DoubleEndedIterator<Item = Block> {
        self.first..=self.last
    }
}

/// Resolved block layout for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockLayout {
    /// Number of blocks in a day across both shifts.
    pub total_blocks: Block,
    /// Last block valid for the morning shift.
    pub morning_end: Block,
    /// First block valid for the afternoon shift.
    pub afternoon_start: Block,
}

impl BlockLayout {
    /// Resolves the layout from configuration.
    ///
    /// Explicit `morning_end_block` / `afternoon_start_block` win over
    /// `shift_boundary_block`; with neither, the morning ends at its block
    /// count and the afternoon starts on that same block.
    ///
    /// # Errors
    /// `ScheduleError::Config` when a count is zero or the boundaries leave a
    /// dead block between the shifts or fall outside the day.
    pub fn from_config(config: &EngineConfig) -> ScheduleResult<Self> {
        if config.morning_block_count == 0 {
            return Err(ScheduleError::Config(
                "morning block count must be positive".into(),
            ));
        }
        if config.afternoon_block_count == 0 {
            return Err(ScheduleError::Config(
                "afternoon block count must be positive".into(),
            ));
        }

        let morning_end = config
            .morning_end_block
            .or(config.shift_boundary_block)
            .unwrap_or(config.morning_block_count);
        let afternoon_start = config
            .afternoon_start_block
            .or(config.shift_boundary_block)
            .unwrap_or(morning_end);

        if morning_end == 0 || afternoon_start == 0 {
            return Err(ScheduleError::Config("blocks are numbered from 1".into()));
        }
        if afternoon_start > morning_end + 1 {
            return Err(ScheduleError::Config(format!(
                "afternoon starts at block {afternoon_start} but morning ends at {morning_end}: \
                 blocks in between belong to no shift"
            )));
        }

        let total_blocks = afternoon_start + config.afternoon_block_count - 1;
        if morning_end > total_blocks {
            return Err(ScheduleError::Config(format!(
                "morning end block {morning_end} exceeds the {total_blocks} blocks of the day"
            )));
        }

        Ok(Self {
            total_blocks,
            morning_end,
            afternoon_start,
        })
    }

    /// Every block of the day (the teacher-side range).
    pub fn all(&self) -> BlockRange {
        BlockRange::new(1, self.total_blocks)
    }

    /// Blocks valid for the morning shift.
    pub fn morning(&self) -> BlockRange {
        BlockRange::new(1, self.morning_end)
    }

    /// Blocks valid for the afternoon shift.
    pub fn afternoon(&self) -> BlockRange {
        BlockRange::new(self.afternoon_start, self.total_blocks)
    }

    /// Blocks valid for a shift.
    pub fn shift_range(&self, shift: Shift) -> BlockRange {
        match shift {
            Shift::Morning => self.morning(),
            Shift::Afternoon => self.afternoon(),
        }
    }

    /// Whether `block` is valid for `shift`.
    #[inline]
    pub fn is_valid_for(&self, shift: Shift, block: Block) -> bool {
        self.shift_range(shift).contains(block)
    }
}
