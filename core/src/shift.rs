//! Shift blocks, the roster unit handed to the simulation engine.
//!
//! A block is a homogeneous group of agents sharing one contiguous
//! working window. Rosters are plain `Vec<ShiftBlock>` values.

use crate::{
    curve::Granularity,
    error::{StaffingError, StaffingResult},
    types::{IntervalIndex, Seconds, DAY_SECONDS},
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// End of a working window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftEnd {
    At(Seconds),
    /// Keeps working until the simulated day is over.
    OpenEnd,
}

impl ShiftEnd {
    pub fn seconds(self) -> Seconds {
        match self {
            Self::At(s)   => s,
            Self::OpenEnd => DAY_SECONDS,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::OpenEnd)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftBlock {
    pub count:       u32,
    pub start:       Seconds,
    pub end:         ShiftEnd,
    pub skill_level: String,
}

impl ShiftBlock {
    /// Validated constructor for externally supplied windows.
    /// Fails with `EmptyShiftBlock` for a zero count and `InvalidWindow`
    /// for an empty or out-of-day window.
    pub fn new(
        count: u32,
        start: Seconds,
        end: ShiftEnd,
        skill_level: impl Into<String>,
    ) -> StaffingResult<Self> {
        if count == 0 {
            return Err(StaffingError::EmptyShiftBlock);
        }
        let end_s = end.seconds();
        if start >= end_s || end_s > DAY_SECONDS {
            return Err(StaffingError::InvalidWindow { start, end: end_s });
        }
        Ok(Self { count, start, end, skill_level: skill_level.into() })
    }

    /// Block spanning intervals `[first, last_exclusive)` of `granularity`.
    pub(crate) fn from_intervals(
        count: u32,
        first: IntervalIndex,
        last_exclusive: IntervalIndex,
        granularity: Granularity,
        open_end: bool,
        skill_level: &str,
    ) -> Self {
        let len = granularity.interval_seconds();
        let end = if open_end {
            ShiftEnd::OpenEnd
        } else {
            ShiftEnd::At(last_exclusive as Seconds * len)
        };
        Self {
            count,
            start: first as Seconds * len,
            end,
            skill_level: skill_level.to_string(),
        }
    }

    pub fn end_seconds(&self) -> Seconds {
        self.end.seconds()
    }

    pub fn duration(&self) -> Seconds {
        self.end_seconds().saturating_sub(self.start)
    }

    /// Length in whole intervals. Open-ended blocks count up to midnight.
    pub fn length_in(&self, granularity: Granularity) -> u32 {
        self.duration() / granularity.interval_seconds()
    }

    /// True if the block works during any part of the interval.
    pub fn covers(&self, interval: IntervalIndex, granularity: Granularity) -> bool {
        let len = granularity.interval_seconds();
        let from = interval as Seconds * len;
        self.start < from + len && self.end_seconds() > from
    }

    /// Paid agent-seconds for the whole block.
    pub fn agent_seconds(&self) -> u64 {
        self.count as u64 * self.duration() as u64
    }
}

impl fmt::Display for ShiftBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = match self.end {
            ShiftEnd::At(s)   => format_clock(s),
            ShiftEnd::OpenEnd => "open end".to_string(),
        };
        write!(f, "{:>3} x {}-{}", self.count, format_clock(self.start), end)?;
        if !self.skill_level.is_empty() {
            write!(f, " [{}]", self.skill_level)?;
        }
        Ok(())
    }
}

/// `HH:MM` for a second of the day; midnight at day end prints `24:00`.
pub fn format_clock(seconds: Seconds) -> String {
    if seconds >= DAY_SECONDS {
        return "24:00".to_string();
    }
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Headcount present in each interval.
pub fn coverage(blocks: &[ShiftBlock], granularity: Granularity) -> Vec<u32> {
    (0..granularity.intervals())
        .map(|i| {
            blocks
                .iter()
                .filter(|b| b.covers(i, granularity))
                .map(|b| b.count)
                .sum()
        })
        .collect()
}

/// Fold blocks with the same window and skill level into one block.
/// Output is ordered by start, then end, then skill level.
pub fn merge_identical(blocks: impl IntoIterator<Item = ShiftBlock>) -> Vec<ShiftBlock> {
    let mut merged: BTreeMap<(Seconds, ShiftEnd, String), u32> = BTreeMap::new();
    for block in blocks {
        *merged
            .entry((block.start, block.end, block.skill_level))
            .or_insert(0) += block.count;
    }
    merged
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|((start, end, skill_level), count)| ShiftBlock { count, start, end, skill_level })
        .collect()
}
