//! Caller-load aggregation: staffing proportional to caller arrivals.
//!
//! The agent group's budget of available half-hours is spread across
//! the day in proportion to the weighted fresh-call arrivals of the
//! caller types it serves. The result lives on the canonical half-hour
//! grid; use `IntervalCurve::resample` for other granularities.

use crate::{
    curve::{Granularity, IntervalCurve},
    error::{StaffingError, StaffingResult},
    model::CallerType,
};
use serde::{Deserialize, Serialize};

/// Share of one caller type's arrivals an agent group staffs for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerWeight {
    pub caller_type: String,
    pub rate:        f64,
}

impl CallerWeight {
    pub fn new(caller_type: impl Into<String>, rate: f64) -> Self {
        Self { caller_type: caller_type.into(), rate }
    }
}

pub struct CallerLoadAggregator<'a> {
    callers: &'a [CallerType],
}

impl<'a> CallerLoadAggregator<'a> {
    pub fn new(callers: &'a [CallerType]) -> Self {
        Self { callers }
    }

    /// Weighted sum of arrival curves on the half-hour grid.
    ///
    /// Caller types are matched by name, ignoring ASCII case. Unknown
    /// names are skipped; negative rates count as zero.
    pub fn weighted_arrivals(&self, weights: &[CallerWeight]) -> StaffingResult<IntervalCurve> {
        let mut load = IntervalCurve::zeros(Granularity::HalfHourly);
        for weight in weights {
            let Some(caller) = self
                .callers
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(&weight.caller_type))
            else {
                log::warn!("caller load: unknown caller type '{}' skipped", weight.caller_type);
                continue;
            };
            if let Some((interval, value)) = caller.arrivals.first_invalid() {
                return Err(StaffingError::NegativeDemand { interval, value });
            }
            let rate = weight.rate.max(0.0);
            load = load.add_curve(&caller.arrivals.multiply(rate));
        }
        Ok(load)
    }

    /// Demand curve for `group`: `available_half_hours` distributed in
    /// proportion to the weighted arrival mass. Each interval is rounded
    /// on its own and topped up when that falls short of the budget, so
    /// the whole budget is always handed out, sometimes a little more.
    pub fn aggregate(
        &self,
        group: &str,
        available_half_hours: u32,
        weights: &[CallerWeight],
    ) -> StaffingResult<IntervalCurve> {
        let load = self.weighted_arrivals(weights)?;
        let total = load.sum();
        if !(total > 0.0) {
            return Err(StaffingError::NoLoadSignal { group: group.to_string() });
        }

        let demand = load
            .multiply(available_half_hours as f64 / total)
            .round_with_top_up(available_half_hours);
        log::debug!(
            "caller load '{group}': budget={available_half_hours} weighted_mass={total:.2} peak={}",
            demand.max_value()
        );
        Ok(demand)
    }
}
