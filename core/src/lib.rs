//! Workforce interval-to-shift conversion for multi-skill callcenter models.
//!
//! Converts per-interval staffing demand into shift rosters, derives
//! demand from weighted caller arrivals, applies productivity and
//! sickness-surcharge overlays, and rescales staffing for copies.

pub mod caller_load;
pub mod config;
pub mod curve;
pub mod decomposer;
pub mod error;
pub mod model;
pub mod overlay;
pub mod planner;
pub mod rng;
pub mod scale;
pub mod shift;
pub mod staffing;
pub mod types;

pub use caller_load::{CallerLoadAggregator, CallerWeight};
pub use config::PlannerConfig;
pub use curve::{Granularity, IntervalCurve};
pub use decomposer::{LevelSetStrategy, ShiftConstraints, ShiftDecomposer, ShiftStrategy, StrategyKind, SweepStrategy};
pub use error::{StaffingError, StaffingResult};
pub use model::{AgentGroup, Callcenter, CallcenterModel, CallerType};
pub use overlay::{GlobalOverlays, Overlay, OverlayApplier, OverlayKind, OverlaySet};
pub use planner::{CallcenterRoster, GroupRoster, RosterPlanner};
pub use scale::ScaleTransform;
pub use shift::{ShiftBlock, ShiftEnd};
pub use staffing::{ShiftLengths, StaffingMode, StaffingSpec};
