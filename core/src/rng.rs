//! Deterministic random numbers for synthetic demand.
//!
//! RULE: Nothing in the crate may call any platform RNG.
//! Synthetic curves come from a seeded PCG stream so that runner
//! output and property tests are reproducible from the seed alone.

use crate::curve::{Granularity, IntervalCurve};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Opening hours used for synthetic days, `[open, close)` in hours.
const OPEN_HOUR: f64 = 7.0;
const CLOSE_HOUR: f64 = 20.0;

pub struct DemandRng {
    inner: Pcg64Mcg,
}

impl DemandRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Pick one of the supported granularities.
    pub fn granularity(&mut self) -> Granularity {
        Granularity::ALL[self.next_u64_below(Granularity::ALL.len() as u64) as usize]
    }

    /// A call-center shaped day: a morning and an afternoon peak, noise of
    /// +-15%, nobody outside opening hours. Values are whole agents.
    pub fn demand_curve(&mut self, granularity: Granularity, peak: u32) -> IntervalCurve {
        let values = self
            .day_shape(granularity)
            .into_iter()
            .map(|shape| (shape * peak as f64).round())
            .collect();
        build(granularity, values)
    }

    /// Fresh-call arrivals with the same shape, scaled to `volume` calls a day.
    pub fn arrival_curve(&mut self, granularity: Granularity, volume: f64) -> IntervalCurve {
        let shape = self.day_shape(granularity);
        let total: f64 = shape.iter().sum();
        let scale = if total > 0.0 { volume / total } else { 0.0 };
        build(granularity, shape.into_iter().map(|s| s * scale).collect())
    }

    fn day_shape(&mut self, granularity: Granularity) -> Vec<f64> {
        let n = granularity.intervals();
        (0..n)
            .map(|i| {
                let hour = (i as f64 + 0.5) * 24.0 / n as f64;
                if !(OPEN_HOUR..CLOSE_HOUR).contains(&hour) {
                    return 0.0;
                }
                let shape = bump(hour, 10.0, 2.0) + 0.8 * bump(hour, 15.0, 2.5);
                shape * (0.85 + 0.3 * self.next_f64())
            })
            .collect()
    }
}

fn bump(x: f64, mean: f64, width: f64) -> f64 {
    (-(x - mean).powi(2) / (2.0 * width * width)).exp()
}

// Lengths always match the granularity; the fallback is unreachable.
fn build(granularity: Granularity, values: Vec<f64>) -> IntervalCurve {
    IntervalCurve::from_values(values).unwrap_or_else(|_| IntervalCurve::zeros(granularity))
}
