//! Roster planner. Turns a model's agent groups into shift rosters.
//!
//! PIPELINE (fixed order, per agent group):
//!   1. Skip inactive groups, reject invalid headcounts, then skip
//!      groups that staff nobody.
//!   2. Fixed window: the window itself is the roster.
//!   3. Derive the demand curve (distribution as given, or caller load).
//!   4. Apply overlays: productivity, then surcharge, as configured.
//!   5. Resolve shift lengths (group, else model) on the curve's grid.
//!   6. Decompose with the configured strategy.
//!
//! The planner only reads the model. Rosters are new values.

use crate::{
    caller_load::CallerLoadAggregator,
    config::PlannerConfig,
    curve::{Granularity, IntervalCurve},
    decomposer::ShiftDecomposer,
    error::StaffingResult,
    model::{AgentGroup, Callcenter, CallcenterModel},
    overlay::OverlayApplier,
    shift::{coverage, ShiftBlock},
    staffing::StaffingMode,
};
use serde::Serialize;

/// Shift blocks planned for one agent group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRoster {
    /// Position of the group within its callcenter.
    pub group_index: usize,
    pub skill_level: String,
    pub blocks:      Vec<ShiftBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallcenterRoster {
    pub callcenter: String,
    pub groups:     Vec<GroupRoster>,
}

impl CallcenterRoster {
    pub fn blocks(&self) -> impl Iterator<Item = &ShiftBlock> {
        self.groups.iter().flat_map(|g| g.blocks.iter())
    }

    pub fn agent_count(&self) -> u32 {
        self.blocks().map(|b| b.count).sum()
    }

    /// Paid agent-hours over the day.
    pub fn agent_hours(&self) -> f64 {
        self.blocks().map(|b| b.agent_seconds()).sum::<u64>() as f64 / 3600.0
    }

    /// Headcount present per interval across all groups.
    pub fn coverage(&self, granularity: Granularity) -> Vec<u32> {
        let blocks: Vec<ShiftBlock> = self.blocks().cloned().collect();
        coverage(&blocks, granularity)
    }
}

pub struct RosterPlanner<'a> {
    model:      &'a CallcenterModel,
    config:     PlannerConfig,
    decomposer: ShiftDecomposer,
}

impl<'a> RosterPlanner<'a> {
    pub fn new(model: &'a CallcenterModel, config: PlannerConfig) -> Self {
        let decomposer = ShiftDecomposer::new(config.strategy.build());
        Self { model, config, decomposer }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Demand before overlays. `None` for fixed-window groups.
    ///
    /// Caller-load groups fail with `NoLoadSignal` when their weights
    /// select no arrivals at all.
    pub fn demand_curve(&self, group: &AgentGroup) -> StaffingResult<Option<IntervalCurve>> {
        match &group.staffing.mode {
            StaffingMode::Fixed { .. } => Ok(None),
            StaffingMode::Distribution { curve, .. } => Ok(Some(curve.clone())),
            StaffingMode::ByCallerLoad { available_half_hours, weights, .. } => {
                CallerLoadAggregator::new(&self.model.caller_types)
                    .aggregate(group.label(), *available_half_hours, weights)
                    .map(Some)
            }
        }
    }

    /// Demand after the configured overlays, resolved group -> callcenter -> model.
    pub fn effective_demand(
        &self,
        callcenter: &Callcenter,
        group: &AgentGroup,
    ) -> StaffingResult<Option<IntervalCurve>> {
        let Some(base) = self.demand_curve(group)? else {
            return Ok(None);
        };
        let applier = OverlayApplier::for_scope(
            &[&group.overlays, &callcenter.overlays],
            &self.model.overlays,
            self.config.use_productivity,
            self.config.apply_surcharge,
        );
        Ok(Some(applier.apply(&base)))
    }

    /// Shift blocks for one agent group.
    pub fn plan_group(&self, callcenter: &Callcenter, group: &AgentGroup) -> StaffingResult<Vec<ShiftBlock>> {
        if !group.active {
            return Ok(Vec::new());
        }
        group.staffing.validate()?;
        if group.staffing.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(block) = group.staffing.fixed_block(&group.skill_level)? {
            return Ok(vec![block]);
        }
        let Some(demand) = self.effective_demand(callcenter, group)? else {
            return Ok(Vec::new());
        };

        let constraints = group
            .staffing
            .constraints(demand.granularity(), self.model.shift_lengths);
        let blocks = self.decomposer.decompose(&demand, &constraints, &group.skill_level)?;

        log::debug!(
            "callcenter '{}' group '{}': {} blocks, {} agents ({})",
            callcenter.name,
            group.label(),
            blocks.len(),
            blocks.iter().map(|b| b.count).sum::<u32>(),
            self.decomposer.strategy_name(),
        );
        Ok(blocks)
    }

    /// Rosters for every active agent group of a callcenter.
    pub fn plan_callcenter(&self, callcenter: &Callcenter) -> StaffingResult<CallcenterRoster> {
        let mut groups = Vec::new();
        for (group_index, group) in callcenter.agent_groups.iter().enumerate() {
            let blocks = self.plan_group(callcenter, group)?;
            if blocks.is_empty() {
                continue;
            }
            groups.push(GroupRoster {
                group_index,
                skill_level: group.skill_level.clone(),
                blocks,
            });
        }

        let roster = CallcenterRoster { callcenter: callcenter.name.clone(), groups };
        log::info!(
            "callcenter '{}': {} agents, {:.1} agent-hours",
            roster.callcenter,
            roster.agent_count(),
            roster.agent_hours()
        );
        Ok(roster)
    }

    /// Rosters for every active callcenter, in model order.
    pub fn plan_model(&self) -> StaffingResult<Vec<CallcenterRoster>> {
        self.model
            .callcenters
            .iter()
            .filter(|c| c.active)
            .map(|c| self.plan_callcenter(c))
            .collect()
    }
}
