use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaffingError {
    #[error("Invalid shift constraint (minimum {minimum}, preferred {preferred}, day of {intervals} intervals): {reason}")]
    InvalidConstraint {
        minimum:   u32,
        preferred: u32,
        intervals: usize,
        reason:    &'static str,
    },

    #[error("Demand at interval {interval} is negative or not a number: {value}")]
    NegativeDemand { interval: usize, value: f64 },

    #[error("No load signal for agent group '{group}': all caller weights or arrival curves are zero")]
    NoLoadSignal { group: String },

    #[error("Unsupported interval count {intervals}: expected 24, 48 or 96")]
    GranularityMismatch { intervals: usize },

    #[error("Scale ratio must be finite and greater than zero, got {ratio}")]
    InvalidRatio { ratio: f64 },

    #[error("Overlay multiplier at interval {interval} is negative or not finite: {value}")]
    InvalidOverlay { interval: usize, value: f64 },

    #[error("Invalid working window: start {start}s, end {end}s")]
    InvalidWindow { start: u32, end: u32 },

    #[error("Shift block must staff at least one agent")]
    EmptyShiftBlock,

    #[error("Cannot normalize a curve whose values sum to zero")]
    ZeroMass,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StaffingResult<T> = Result<T, StaffingError>;
