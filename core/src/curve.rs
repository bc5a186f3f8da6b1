//! Interval curves over one simulated day of 24, 48 or 96 equal slices.
//!
//! RULE: every operation returns a new curve. Nothing in this module
//! mutates a curve in place, so agent groups that were copied from one
//! another may share a curve value without ever corrupting each other.

use crate::{
    error::{StaffingError, StaffingResult},
    scale::validate_ratio,
    types::{IntervalIndex, Seconds, DAY_SECONDS, HALF_HOURS_PER_DAY},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of intervals a day is divided into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum Granularity {
    Hourly,        // 24 x 60 min
    #[default]
    HalfHourly,    // 48 x 30 min
    QuarterHourly, // 96 x 15 min
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [
        Granularity::Hourly,
        Granularity::HalfHourly,
        Granularity::QuarterHourly,
    ];

    pub fn intervals(self) -> usize {
        match self {
            Self::Hourly        => 24,
            Self::HalfHourly    => 48,
            Self::QuarterHourly => 96,
        }
    }

    pub fn interval_seconds(self) -> Seconds {
        DAY_SECONDS / self.intervals() as Seconds
    }

    /// Interval containing the given second of the day.
    /// Seconds at or past midnight land in the last interval.
    pub fn interval_at(self, seconds: Seconds) -> IntervalIndex {
        ((seconds / self.interval_seconds()) as usize).min(self.intervals() - 1)
    }

    /// Convert a length on the half-hour grid into whole intervals of
    /// this granularity, rounding half away from zero.
    pub fn from_half_hours(self, half_hours: u32) -> u32 {
        (half_hours as f64 * self.intervals() as f64 / HALF_HOURS_PER_DAY as f64).round() as u32
    }
}

impl TryFrom<usize> for Granularity {
    type Error = StaffingError;

    fn try_from(intervals: usize) -> StaffingResult<Self> {
        match intervals {
            24 => Ok(Self::Hourly),
            48 => Ok(Self::HalfHourly),
            96 => Ok(Self::QuarterHourly),
            _  => Err(StaffingError::GranularityMismatch { intervals }),
        }
    }
}

impl From<Granularity> for usize {
    fn from(g: Granularity) -> usize { g.intervals() }
}

/// A fixed-length numeric curve over one day.
///
/// Serialises as a plain JSON array; the array length selects the
/// granularity and anything other than 24, 48 or 96 values is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct IntervalCurve {
    granularity: Granularity,
    values:      Vec<f64>,
}

impl IntervalCurve {
    /// A curve with every interval set to `fill`.
    pub fn new(granularity: Granularity, fill: f64) -> Self {
        Self {
            granularity,
            values: vec![fill; granularity.intervals()],
        }
    }

    pub fn zeros(granularity: Granularity) -> Self {
        Self::new(granularity, 0.0)
    }

    /// Build a curve from raw values. The value count picks the granularity.
    pub fn from_values(values: Vec<f64>) -> StaffingResult<Self> {
        let granularity = Granularity::try_from(values.len())?;
        Ok(Self { granularity, values })
    }

    pub fn granularity(&self) -> Granularity { self.granularity }

    pub fn values(&self) -> &[f64] { &self.values }

    pub fn intervals(&self) -> usize { self.values.len() }

    pub fn get(&self, interval: IntervalIndex) -> Option<f64> {
        self.values.get(interval).copied()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// First interval whose value is negative or NaN, if any.
    pub fn first_invalid(&self) -> Option<(IntervalIndex, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !(*v >= 0.0))
    }

    pub fn is_integral(&self) -> bool {
        self.values.iter().all(|v| v.fract() == 0.0)
    }

    /// Mass-preserving resample. Refining splits each value evenly over
    /// its sub-intervals; coarsening sums adjacent values.
    pub fn resample(&self, target: Granularity) -> IntervalCurve {
        let from = self.intervals();
        let to = target.intervals();
        let values = match from.cmp(&to) {
            Ordering::Equal => self.values.clone(),
            Ordering::Less => {
                let k = to / from;
                self.values
                    .iter()
                    .flat_map(|v| std::iter::repeat(v / k as f64).take(k))
                    .collect()
            }
            Ordering::Greater => {
                let k = from / to;
                self.values.chunks(k).map(|c| c.iter().sum()).collect()
            }
        };
        IntervalCurve { granularity: target, values }
    }

    /// Level-preserving resample for per-interval rates such as overlay
    /// multipliers. Refining repeats each value; coarsening averages.
    pub fn resample_level(&self, target: Granularity) -> IntervalCurve {
        let from = self.intervals();
        let to = target.intervals();
        let values = match from.cmp(&to) {
            Ordering::Equal => self.values.clone(),
            Ordering::Less => {
                let k = to / from;
                self.values
                    .iter()
                    .flat_map(|v| std::iter::repeat(*v).take(k))
                    .collect()
            }
            Ordering::Greater => {
                let k = from / to;
                self.values
                    .chunks(k)
                    .map(|c| c.iter().sum::<f64>() / k as f64)
                    .collect()
            }
        };
        IntervalCurve { granularity: target, values }
    }

    /// Multiply by `ratio` and round every interval to a whole agent count.
    ///
    /// Intervals that were positive before scaling never drop below 1.
    /// Scaling an integral curve by 1.0 returns it unchanged.
    pub fn scale(&self, ratio: f64) -> StaffingResult<IntervalCurve> {
        validate_ratio(ratio)?;
        Ok(self.map(|v| {
            let scaled = (v * ratio).round();
            if v > 0.0 && scaled < 1.0 { 1.0 } else { scaled }
        }))
    }

    /// Plain multiplication without rounding.
    pub fn multiply(&self, factor: f64) -> IntervalCurve {
        self.map(|v| v * factor)
    }

    /// Round every interval half away from zero.
    pub fn round(&self) -> IntervalCurve {
        self.map(f64::round)
    }

    /// Interval-wise sum. `other` is brought onto this curve's
    /// granularity with a mass-preserving resample first.
    pub fn add_curve(&self, other: &IntervalCurve) -> IntervalCurve {
        let other = other.resample(self.granularity);
        let values = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a + b)
            .collect();
        IntervalCurve { granularity: self.granularity, values }
    }

    /// Interval-wise product with a curve of rates. `factors` is brought
    /// onto this curve's granularity with a level-preserving resample.
    pub fn product(&self, factors: &IntervalCurve) -> IntervalCurve {
        let factors = factors.resample_level(self.granularity);
        let values = self
            .values
            .iter()
            .zip(factors.values.iter())
            .map(|(a, b)| a * b)
            .collect();
        IntervalCurve { granularity: self.granularity, values }
    }

    /// Divide by the total so the curve sums to 1.
    pub fn normalize(&self) -> StaffingResult<IntervalCurve> {
        let total = self.sum();
        if !(total > 0.0) {
            return Err(StaffingError::ZeroMass);
        }
        Ok(self.map(|v| v / total))
    }

    /// Round every interval, then top up until the curve sums to at
    /// least `total`.
    ///
    /// Intervals that were rounded down receive the missing units, the
    /// largest fractional part first and the earliest interval on ties,
    /// one unit per interval. Rounding up that overshoots `total` is kept.
    pub fn round_with_top_up(&self, total: u32) -> IntervalCurve {
        let mut rounded: Vec<f64> = self.values.iter().map(|v| v.round()).collect();
        let assigned: f64 = rounded.iter().sum();
        let missing = (total as f64 - assigned).round().max(0.0) as usize;

        if missing > 0 {
            let fraction = |i: usize| {
                let v = self.values[i];
                if rounded[i] < v { v - v.floor() } else { 0.0 }
            };
            let mut order: Vec<IntervalIndex> = (0..self.values.len())
                .filter(|&i| fraction(i) > 0.0)
                .collect();
            order.sort_by(|&a, &b| {
                fraction(b).partial_cmp(&fraction(a)).unwrap_or(Ordering::Equal).then(a.cmp(&b))
            });
            for i in order.into_iter().take(missing) {
                rounded[i] += 1.0;
            }
        }

        IntervalCurve { granularity: self.granularity, values: rounded }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> IntervalCurve {
        IntervalCurve {
            granularity: self.granularity,
            values:      self.values.iter().copied().map(f).collect(),
        }
    }
}

impl TryFrom<Vec<f64>> for IntervalCurve {
    type Error = StaffingError;

    fn try_from(values: Vec<f64>) -> StaffingResult<Self> {
        Self::from_values(values)
    }
}

impl From<IntervalCurve> for Vec<f64> {
    fn from(curve: IntervalCurve) -> Vec<f64> { curve.values }
}
