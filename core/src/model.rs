//! The callcenter model the planner reads.
//!
//! Model -> callcenters -> agent groups, plus the caller types whose
//! arrival curves drive caller-load staffing. Every type here is a
//! plain value; copies never share curves by reference.

use crate::{
    curve::IntervalCurve,
    error::StaffingResult,
    overlay::{GlobalOverlays, OverlaySet},
    staffing::{ShiftLengths, StaffingSpec},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A caller type as far as staffing is concerned: its name and its
/// expected fresh-call arrivals per interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallerType {
    pub name:     String,
    pub arrivals: IntervalCurve,
}

impl CallerType {
    pub fn new(name: impl Into<String>, arrivals: IntervalCurve) -> Self {
        Self { name: name.into(), arrivals }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentGroup {
    #[serde(default = "default_active")]
    pub active:      bool,
    #[serde(default)]
    pub skill_level: String,
    pub staffing:    StaffingSpec,
    #[serde(default)]
    pub overlays:    OverlaySet,
}

impl AgentGroup {
    pub fn new(skill_level: impl Into<String>, staffing: StaffingSpec) -> Self {
        Self {
            active: true,
            skill_level: skill_level.into(),
            staffing,
            overlays: OverlaySet::default(),
        }
    }

    /// Label used in logs and errors.
    pub fn label(&self) -> &str {
        if self.skill_level.is_empty() { "<unnamed>" } else { self.skill_level.as_str() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callcenter {
    pub name:         String,
    #[serde(default = "default_active")]
    pub active:       bool,
    #[serde(default)]
    pub overlays:     OverlaySet,
    #[serde(default)]
    pub agent_groups: Vec<AgentGroup>,
}

impl Callcenter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            overlays: OverlaySet::default(),
            agent_groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: AgentGroup) -> Self {
        self.agent_groups.push(group);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallcenterModel {
    #[serde(default)]
    pub name:          String,
    #[serde(default = "default_shift_lengths")]
    pub shift_lengths: ShiftLengths,
    #[serde(default)]
    pub overlays:      GlobalOverlays,
    #[serde(default)]
    pub callcenters:   Vec<Callcenter>,
    #[serde(default)]
    pub caller_types:  Vec<CallerType>,
}

impl Default for CallcenterModel {
    fn default() -> Self {
        Self {
            name:          String::new(),
            shift_lengths: ShiftLengths::MODEL_DEFAULT,
            overlays:      GlobalOverlays::default(),
            callcenters:   Vec::new(),
            caller_types:  Vec::new(),
        }
    }
}

impl CallcenterModel {
    /// Load a model from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let model = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        log::info!(
            "loaded model '{}': {} callcenters, {} caller types",
            model.name,
            model.callcenters.len(),
            model.caller_types.len()
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> StaffingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn callcenter(&self, name: &str) -> Option<&Callcenter> {
        self.callcenters.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Like `callcenter`, but a missing name is an error.
    pub fn callcenter_named(&self, name: &str) -> StaffingResult<&Callcenter> {
        self.callcenter(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown callcenter: {name}").into())
    }
}

fn default_active() -> bool { true }

fn default_shift_lengths() -> ShiftLengths { ShiftLengths::MODEL_DEFAULT }
