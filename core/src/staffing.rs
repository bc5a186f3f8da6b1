//! Staffing specifications: how an agent group states its headcount.
//!
//! Exactly one of three modes applies to a group:
//!   - Fixed:        a headcount working one window.
//!   - Distribution: a headcount per interval, turned into shifts.
//!   - ByCallerLoad: a half-hour budget spread along caller arrivals.

use crate::{
    caller_load::CallerWeight,
    curve::{Granularity, IntervalCurve},
    decomposer::ShiftConstraints,
    error::{StaffingError, StaffingResult},
    shift::{ShiftBlock, ShiftEnd},
    types::{Seconds, DAY_SECONDS},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StaffingMode {
    Fixed {
        count: u32,
        start: Seconds,
        end:   ShiftEnd,
    },
    Distribution {
        curve: IntervalCurve,
        #[serde(default)]
        last_interval_open_end: bool,
    },
    ByCallerLoad {
        available_half_hours: u32,
        weights:              Vec<CallerWeight>,
        #[serde(default)]
        last_interval_open_end: bool,
    },
}

/// Shift lengths in half-hours. At group level 0 inherits the model value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftLengths {
    #[serde(default)]
    pub preferred: u32,
    #[serde(default)]
    pub minimum:   u32,
}

impl ShiftLengths {
    pub const MODEL_DEFAULT: ShiftLengths = ShiftLengths { preferred: 16, minimum: 1 };

    pub fn new(preferred: u32, minimum: u32) -> Self {
        Self { preferred, minimum }
    }

    /// Take each length from `self` where set, else from `defaults`.
    pub fn or(self, defaults: ShiftLengths) -> ShiftLengths {
        ShiftLengths {
            preferred: if self.preferred > 0 { self.preferred } else { defaults.preferred },
            minimum:   if self.minimum > 0 { self.minimum } else { defaults.minimum },
        }
    }

    /// Interval-based constraints for a curve of `granularity`.
    pub fn to_constraints(self, granularity: Granularity) -> ShiftConstraints {
        ShiftConstraints::new(
            granularity.from_half_hours(self.minimum),
            granularity.from_half_hours(self.preferred),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingSpec {
    #[serde(flatten)]
    pub mode:          StaffingMode,
    #[serde(default)]
    pub shift_lengths: ShiftLengths,
}

impl StaffingSpec {
    pub fn new(mode: StaffingMode) -> Self {
        Self { mode, shift_lengths: ShiftLengths::default() }
    }

    pub fn fixed(count: u32, start: Seconds, end: ShiftEnd) -> Self {
        Self::new(StaffingMode::Fixed { count, start, end })
    }

    /// The whole day, like a freshly created group.
    pub fn all_day(count: u32) -> Self {
        Self::fixed(count, 0, ShiftEnd::At(DAY_SECONDS))
    }

    pub fn distribution(curve: IntervalCurve) -> Self {
        Self::new(StaffingMode::Distribution { curve, last_interval_open_end: false })
    }

    pub fn by_caller_load(available_half_hours: u32, weights: Vec<CallerWeight>) -> Self {
        Self::new(StaffingMode::ByCallerLoad {
            available_half_hours,
            weights,
            last_interval_open_end: false,
        })
    }

    pub fn with_shift_lengths(mut self, shift_lengths: ShiftLengths) -> Self {
        self.shift_lengths = shift_lengths;
        self
    }

    pub fn with_open_end(mut self, open_end: bool) -> Self {
        match &mut self.mode {
            StaffingMode::Distribution { last_interval_open_end, .. }
            | StaffingMode::ByCallerLoad { last_interval_open_end, .. } => {
                *last_interval_open_end = open_end;
            }
            StaffingMode::Fixed { .. } => {}
        }
        self
    }

    pub fn last_interval_open_end(&self) -> bool {
        match &self.mode {
            StaffingMode::Distribution { last_interval_open_end, .. }
            | StaffingMode::ByCallerLoad { last_interval_open_end, .. } => *last_interval_open_end,
            StaffingMode::Fixed { end, .. } => end.is_open(),
        }
    }

    /// Rejects a distribution holding a negative or NaN headcount.
    pub fn validate(&self) -> StaffingResult<()> {
        if let StaffingMode::Distribution { curve, .. } = &self.mode {
            if let Some((interval, value)) = curve.first_invalid() {
                return Err(StaffingError::NegativeDemand { interval, value });
            }
        }
        Ok(())
    }

    /// True when the spec staffs nobody at all.
    pub fn is_empty(&self) -> bool {
        match &self.mode {
            StaffingMode::Fixed { count, .. } => *count == 0,
            StaffingMode::Distribution { curve, .. } => curve.max_value() <= 0.0,
            StaffingMode::ByCallerLoad { available_half_hours, .. } => *available_half_hours == 0,
        }
    }

    /// Constraints for a demand curve of `granularity`, with group lengths
    /// falling back to `defaults` and the open-end flag applied.
    pub fn constraints(&self, granularity: Granularity, defaults: ShiftLengths) -> ShiftConstraints {
        self.shift_lengths
            .or(defaults)
            .to_constraints(granularity)
            .with_open_end(self.last_interval_open_end())
    }

    /// The single block of a fixed-window group; `None` for other modes
    /// and for a headcount of zero.
    pub fn fixed_block(&self, skill_level: &str) -> StaffingResult<Option<ShiftBlock>> {
        match &self.mode {
            StaffingMode::Fixed { count, start, end } if *count > 0 => {
                ShiftBlock::new(*count, *start, *end, skill_level).map(Some)
            }
            _ => Ok(None),
        }
    }
}
