//! Productivity and sickness-surcharge overlays.
//!
//! An overlay is a per-half-hour multiplier. Each scope (agent group,
//! callcenter) either defines its own overlay or inherits the next one
//! up; the model-wide overlays are always defined and default to 1.0.
//!
//! Composition order is fixed: productivity first, surcharge on top of
//! the productivity-adjusted value, rounded once at the end.

use crate::{
    curve::{Granularity, IntervalCurve},
    error::{StaffingError, StaffingResult},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    Productivity,
    Surcharge,
}

/// Multipliers on the 48-interval grid. A constant overlay is simply
/// the same value in every interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalCurve", into = "IntervalCurve")]
pub struct Overlay {
    factors: IntervalCurve,
}

impl Overlay {
    pub fn neutral() -> Self {
        Self { factors: IntervalCurve::new(Granularity::HalfHourly, 1.0) }
    }

    pub fn constant(factor: f64) -> StaffingResult<Self> {
        Self::from_curve(IntervalCurve::new(Granularity::HalfHourly, factor))
    }

    /// Accepts any supported granularity; stored on the half-hour grid.
    pub fn from_curve(curve: IntervalCurve) -> StaffingResult<Self> {
        if let Some((interval, value)) = curve
            .values()
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(StaffingError::InvalidOverlay { interval, value });
        }
        Ok(Self { factors: curve.resample_level(Granularity::HalfHourly) })
    }

    pub fn factors(&self) -> &IntervalCurve {
        &self.factors
    }

    /// Multipliers on the given granularity (levels repeated or averaged).
    pub fn at(&self, granularity: Granularity) -> IntervalCurve {
        self.factors.resample_level(granularity)
    }

    /// The single factor if every interval carries the same value.
    pub fn as_constant(&self) -> Option<f64> {
        let values = self.factors.values();
        let first = values[0];
        values.iter().all(|v| *v == first).then_some(first)
    }
}

impl Default for Overlay {
    fn default() -> Self { Self::neutral() }
}

impl TryFrom<IntervalCurve> for Overlay {
    type Error = StaffingError;

    fn try_from(curve: IntervalCurve) -> StaffingResult<Self> {
        Self::from_curve(curve)
    }
}

impl From<Overlay> for IntervalCurve {
    fn from(overlay: Overlay) -> IntervalCurve { overlay.factors }
}

/// Local overlays of one scope. `None` inherits from the enclosing scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productivity: Option<Overlay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharge:    Option<Overlay>,
}

impl OverlaySet {
    pub fn get(&self, kind: OverlayKind) -> Option<&Overlay> {
        match kind {
            OverlayKind::Productivity => self.productivity.as_ref(),
            OverlayKind::Surcharge    => self.surcharge.as_ref(),
        }
    }
}

/// Model-wide overlays; always defined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalOverlays {
    #[serde(default)]
    pub productivity: Overlay,
    #[serde(default)]
    pub surcharge:    Overlay,
}

impl GlobalOverlays {
    pub fn get(&self, kind: OverlayKind) -> &Overlay {
        match kind {
            OverlayKind::Productivity => &self.productivity,
            OverlayKind::Surcharge    => &self.surcharge,
        }
    }
}

/// First overlay of `kind` defined along `chain` (most specific scope
/// first), falling back to the model-wide one.
pub fn resolve<'a>(
    kind: OverlayKind,
    chain: &[&'a OverlaySet],
    global: &'a GlobalOverlays,
) -> &'a Overlay {
    chain
        .iter()
        .copied()
        .find_map(|scope| scope.get(kind))
        .unwrap_or_else(|| global.get(kind))
}

/// `round(base[i] * overlay[i])` on the base curve's granularity.
pub fn apply_overlay(base: &IntervalCurve, overlay: &Overlay) -> IntervalCurve {
    OverlayApplier { productivity: Some(overlay.clone()), surcharge: None }.apply(base)
}

/// Applies the resolved overlays of one agent group.
#[derive(Debug, Clone, Default)]
pub struct OverlayApplier {
    pub productivity: Option<Overlay>,
    pub surcharge:    Option<Overlay>,
}

impl OverlayApplier {
    /// Resolve both kinds for a scope chain. Disabled kinds stay `None`.
    pub fn for_scope(
        chain: &[&OverlaySet],
        global: &GlobalOverlays,
        use_productivity: bool,
        use_surcharge: bool,
    ) -> Self {
        Self {
            productivity: use_productivity
                .then(|| resolve(OverlayKind::Productivity, chain, global).clone()),
            surcharge: use_surcharge
                .then(|| resolve(OverlayKind::Surcharge, chain, global).clone()),
        }
    }

    /// `round(base[i] * productivity[i] * surcharge[i])`, rounded once.
    pub fn apply(&self, base: &IntervalCurve) -> IntervalCurve {
        let mut effective = base.clone();
        if let Some(productivity) = &self.productivity {
            effective = effective.product(productivity.factors());
        }
        if let Some(surcharge) = &self.surcharge {
            effective = effective.product(surcharge.factors());
        }
        effective.round()
    }
}
