//! Shift decomposition of a demand curve into a roster of shift blocks.
//!
//! RULES:
//!   - Coverage never falls short: every interval gets at least its
//!     demand, rounded up, in headcount. Over-coverage is allowed.
//!   - No block is shorter than the minimum shift length, including
//!     blocks that run until midnight.
//!   - Blocks with the same window are merged; output is ordered by
//!     start time, earliest first.
//!
//! Strategies only produce per-agent spans over validated integer
//! counts. Validation, open-end handling and merging live in
//! `ShiftDecomposer` so every strategy gets them identically.

use crate::{
    curve::IntervalCurve,
    error::{StaffingError, StaffingResult},
    shift::{merge_identical, ShiftBlock},
    types::IntervalIndex,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Demand this close above a whole number does not call for another agent.
pub const DEMAND_EPSILON: f64 = 1e-9;

/// Shift-length limits in intervals of the demand curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConstraints {
    /// 0 means unrestricted.
    pub minimum: u32,
    /// 0 means no preference: a demand run is never split.
    pub preferred: u32,
    /// Blocks still working at midnight continue open-ended.
    pub last_interval_open_end: bool,
}

impl ShiftConstraints {
    pub fn new(minimum: u32, preferred: u32) -> Self {
        Self { minimum, preferred, last_interval_open_end: false }
    }

    pub fn with_open_end(mut self, open_end: bool) -> Self {
        self.last_interval_open_end = open_end;
        self
    }

    pub fn validate(&self, intervals: usize) -> StaffingResult<()> {
        let reject = |reason| StaffingError::InvalidConstraint {
            minimum: self.minimum,
            preferred: self.preferred,
            intervals,
            reason,
        };
        if self.minimum > 0 && self.preferred > 0 && self.minimum > self.preferred {
            return Err(reject("minimum shift length exceeds preferred shift length"));
        }
        if self.preferred as usize > intervals {
            return Err(reject("preferred shift length exceeds the day"));
        }
        if self.minimum as usize > intervals {
            return Err(reject("minimum shift length exceeds the day"));
        }
        Ok(())
    }

    fn effective_minimum(&self) -> usize {
        (self.minimum as usize).max(1)
    }

    fn effective_preferred(&self, intervals: usize) -> usize {
        if self.preferred == 0 { intervals } else { self.preferred as usize }
    }
}

/// `count` agents working intervals `[first, last_exclusive)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub first:          IntervalIndex,
    pub last_exclusive: IntervalIndex,
    pub count:          u32,
}

impl Span {
    fn new(first: IntervalIndex, last_exclusive: IntervalIndex, count: u32) -> Self {
        Self { first, last_exclusive, count }
    }

    pub fn len(&self) -> usize {
        self.last_exclusive - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.last_exclusive <= self.first || self.count == 0
    }
}

/// A way of covering integer demand with counted spans.
///
/// `minimum` and `preferred` arrive resolved: both at least 1, with
/// `minimum <= preferred <= counts.len()`. Work must not grow with the
/// headcount itself, only with the number of intervals.
pub trait ShiftStrategy: Send + Sync {
    /// Stable name, used in logs and config.
    fn name(&self) -> &'static str;

    fn spans(&self, counts: &[u32], minimum: usize, preferred: usize) -> Vec<Span>;
}

/// Greedy level-set decomposition.
///
/// Each pass takes the highest remaining level and every maximal run
/// of intervals at that level. The run is tiled with preferred-length
/// shifts; a remainder shorter than the minimum is absorbed into the
/// previous tile, and a run shorter than the minimum is stretched to
/// the minimum (later first, earlier when midnight is in the way).
/// The whole height down to the next lower level is staffed in one
/// step, and covered intervals are decremented by that height, so
/// over-coverage from a stretched shift counts towards its neighbours.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelSetStrategy;

impl LevelSetStrategy {
    fn tile(
        first: IntervalIndex,
        last_exclusive: IntervalIndex,
        intervals: usize,
        minimum: usize,
        preferred: usize,
        count: u32,
    ) -> Vec<Span> {
        if last_exclusive - first < minimum {
            let span = if first + minimum <= intervals {
                Span::new(first, first + minimum, count)
            } else {
                Span::new(intervals - minimum, intervals, count)
            };
            return vec![span];
        }

        let mut tiles = Vec::new();
        let mut start = first;
        while last_exclusive - start >= preferred {
            tiles.push(Span::new(start, start + preferred, count));
            start += preferred;
        }
        if start < last_exclusive {
            match tiles.last_mut() {
                Some(prev) if last_exclusive - start < minimum => prev.last_exclusive = last_exclusive,
                _ => tiles.push(Span::new(start, last_exclusive, count)),
            }
        }
        tiles
    }
}

impl ShiftStrategy for LevelSetStrategy {
    fn name(&self) -> &'static str { "level_set" }

    fn spans(&self, counts: &[u32], minimum: usize, preferred: usize) -> Vec<Span> {
        let intervals = counts.len();
        let mut remaining = counts.to_vec();
        let mut spans = Vec::new();

        loop {
            let level = remaining.iter().copied().max().unwrap_or(0);
            if level == 0 {
                break;
            }
            let next = remaining.iter().copied().filter(|&r| r < level).max().unwrap_or(0);
            let height = level - next;

            let mut i = 0;
            while i < intervals {
                if remaining[i] < level {
                    i += 1;
                    continue;
                }
                let run_start = i;
                while i < intervals && remaining[i] >= level {
                    i += 1;
                }
                for tile in Self::tile(run_start, i, intervals, minimum, preferred, height) {
                    for r in &mut remaining[tile.first..tile.last_exclusive] {
                        *r = r.saturating_sub(height);
                    }
                    spans.push(tile);
                }
            }
        }
        spans
    }
}

/// Chronological sweep over the day.
///
/// Agents start when demand rises. When demand falls, the agents who
/// started earliest leave first, but only once they have worked the
/// minimum length. Anyone reaching the preferred length leaves and is
/// replaced by a fresh shift if still needed. Agents still present at
/// midnight finish with the day; those that would be too short are
/// started earlier instead. Agents sharing a start time move as one
/// cohort.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepStrategy;

impl ShiftStrategy for SweepStrategy {
    fn name(&self) -> &'static str { "sweep" }

    fn spans(&self, counts: &[u32], minimum: usize, preferred: usize) -> Vec<Span> {
        let intervals = counts.len();
        // (start, headcount), oldest first
        let mut working: VecDeque<(IntervalIndex, u32)> = VecDeque::new();
        let mut present: u32 = 0;
        let mut spans = Vec::new();

        for (i, &needed) in counts.iter().enumerate() {
            // Release surplus agents who have done their minimum.
            while needed < present {
                let Some(front) = working.front_mut() else { break };
                if front.0 + minimum > i {
                    break;
                }
                let leaving = front.1.min(present - needed);
                spans.push(Span::new(front.0, i, leaving));
                front.1 -= leaving;
                present -= leaving;
                if front.1 == 0 {
                    working.pop_front();
                }
            }

            // Preferred length reached.
            while let Some(&(start, count)) = working.front() {
                if i - start < preferred {
                    break;
                }
                spans.push(Span::new(start, i, count));
                present -= count;
                working.pop_front();
            }

            if present < needed {
                working.push_back((i, needed - present));
                present = needed;
            }
        }

        for (start, count) in working {
            let first = start.min(intervals - minimum);
            spans.push(Span::new(first, intervals, count));
        }
        spans
    }
}

/// Which strategy a planner runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    LevelSet,
    Sweep,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn ShiftStrategy> {
        match self {
            Self::LevelSet => Box::new(LevelSetStrategy),
            Self::Sweep    => Box::new(SweepStrategy),
        }
    }
}

/// Validates input, runs a strategy and assembles the roster.
pub struct ShiftDecomposer {
    strategy: Box<dyn ShiftStrategy>,
}

impl ShiftDecomposer {
    pub fn new(strategy: Box<dyn ShiftStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Convert a demand curve into shift blocks for `skill_level`.
    ///
    /// Fractional demand is rounded up to whole agents first, ignoring
    /// float noise below `DEMAND_EPSILON`. Fails with `NegativeDemand` or
    /// `InvalidConstraint`; never returns a partial roster.
    pub fn decompose(
        &self,
        demand: &IntervalCurve,
        constraints: &ShiftConstraints,
        skill_level: &str,
    ) -> StaffingResult<Vec<ShiftBlock>> {
        let intervals = demand.intervals();
        constraints.validate(intervals)?;
        if let Some((interval, value)) = demand.first_invalid() {
            return Err(StaffingError::NegativeDemand { interval, value });
        }

        let counts: Vec<u32> = demand
            .values()
            .iter()
            .map(|v| (v - DEMAND_EPSILON).ceil().max(0.0) as u32)
            .collect();
        let minimum = constraints.effective_minimum();
        let preferred = constraints.effective_preferred(intervals);
        let granularity = demand.granularity();

        let spans = self.strategy.spans(&counts, minimum, preferred);
        let span_count = spans.len();
        let blocks = merge_identical(spans.into_iter().filter(|s| !s.is_empty()).map(|s| {
            let open = constraints.last_interval_open_end && s.last_exclusive == intervals;
            ShiftBlock::from_intervals(s.count, s.first, s.last_exclusive, granularity, open, skill_level)
        }));

        log::debug!(
            "{} decomposition: {} spans -> {} blocks (min={minimum}, pref={preferred}, n={intervals})",
            self.strategy.name(),
            span_count,
            blocks.len(),
        );
        Ok(blocks)
    }
}

impl Default for ShiftDecomposer {
    fn default() -> Self {
        Self::new(StrategyKind::default().build())
    }
}
