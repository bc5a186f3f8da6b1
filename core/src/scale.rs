//! Scale transform for "copy at X% intensity", for every staffing mode.
//!
//! RULE: anything staffed before scaling stays staffed afterwards.
//! A positive headcount, interval value or half-hour budget never
//! rounds down to zero, however small the ratio.

use crate::{
    error::{StaffingError, StaffingResult},
    model::{AgentGroup, Callcenter, CallcenterModel},
    staffing::{StaffingMode, StaffingSpec},
};

/// Ratios must be finite and strictly positive.
pub fn validate_ratio(ratio: f64) -> StaffingResult<()> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(StaffingError::InvalidRatio { ratio })
    }
}

/// `round(value * ratio)`, floored at 1 when `value` was positive.
pub fn scale_count(value: u32, ratio: f64) -> StaffingResult<u32> {
    validate_ratio(ratio)?;
    let scaled = (value as f64 * ratio).round();
    if value > 0 && scaled < 1.0 {
        return Ok(1);
    }
    Ok(scaled.min(u32::MAX as f64) as u32)
}

pub struct ScaleTransform {
    ratio: f64,
}

impl ScaleTransform {
    pub fn new(ratio: f64) -> StaffingResult<Self> {
        validate_ratio(ratio)?;
        Ok(Self { ratio })
    }

    pub fn ratio(&self) -> f64 { self.ratio }

    /// Distribution curves are rounded per interval and not renormalised.
    pub fn spec(&self, spec: &StaffingSpec) -> StaffingResult<StaffingSpec> {
        let mode = match &spec.mode {
            StaffingMode::Fixed { count, start, end } => StaffingMode::Fixed {
                count: scale_count(*count, self.ratio)?,
                start: *start,
                end:   *end,
            },
            StaffingMode::Distribution { curve, last_interval_open_end } => StaffingMode::Distribution {
                curve: curve.scale(self.ratio)?,
                last_interval_open_end: *last_interval_open_end,
            },
            StaffingMode::ByCallerLoad { available_half_hours, weights, last_interval_open_end } => {
                StaffingMode::ByCallerLoad {
                    available_half_hours: scale_count(*available_half_hours, self.ratio)?,
                    weights: weights.clone(),
                    last_interval_open_end: *last_interval_open_end,
                }
            }
        };
        Ok(StaffingSpec { mode, shift_lengths: spec.shift_lengths })
    }

    pub fn group(&self, group: &AgentGroup) -> StaffingResult<AgentGroup> {
        Ok(AgentGroup {
            staffing: self.spec(&group.staffing)?,
            ..group.clone()
        })
    }

    /// Copy of a callcenter with every agent group scaled.
    pub fn callcenter(&self, callcenter: &Callcenter, new_name: Option<&str>) -> StaffingResult<Callcenter> {
        let agent_groups = callcenter
            .agent_groups
            .iter()
            .map(|g| self.group(g))
            .collect::<StaffingResult<Vec<_>>>()?;
        log::debug!(
            "scaled callcenter '{}' by {:.3} ({} groups)",
            callcenter.name,
            self.ratio,
            agent_groups.len()
        );
        Ok(Callcenter {
            name: new_name.map_or_else(|| callcenter.name.clone(), str::to_string),
            agent_groups,
            ..callcenter.clone()
        })
    }

    /// Scale every agent group of every callcenter in the model.
    pub fn model(&self, model: &CallcenterModel) -> StaffingResult<CallcenterModel> {
        let callcenters = model
            .callcenters
            .iter()
            .map(|c| self.callcenter(c, None))
            .collect::<StaffingResult<Vec<_>>>()?;
        Ok(CallcenterModel { callcenters, ..model.clone() })
    }
}
