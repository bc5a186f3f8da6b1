//! Shared primitive types used across the staffing engine.

/// Seconds since the start of the simulated day.
pub type Seconds = u32;

/// Zero-based index of an interval within a day.
pub type IntervalIndex = usize;

/// Length of one simulated day in seconds.
pub const DAY_SECONDS: Seconds = 86_400;

/// Number of intervals on the canonical half-hour grid. Shift lengths,
/// overlays and caller-load demand are expressed on this grid.
pub const HALF_HOURS_PER_DAY: usize = 48;
