use staffing_core::{
    curve::{Granularity, IntervalCurve},
    decomposer::{ShiftConstraints, ShiftDecomposer, StrategyKind},
    error::StaffingError,
    shift::{coverage, ShiftBlock, ShiftEnd},
};

const HOUR: u32 = 3600;

fn hourly(prefix: &[f64]) -> IntervalCurve {
    let mut values = prefix.to_vec();
    values.resize(24, 0.0);
    IntervalCurve::from_values(values).unwrap()
}

fn block(count: u32, start_hour: u32, end_hour: u32) -> ShiftBlock {
    ShiftBlock::new(count, start_hour * HOUR, ShiftEnd::At(end_hour * HOUR), "").unwrap()
}

fn level_set() -> ShiftDecomposer {
    ShiftDecomposer::new(StrategyKind::LevelSet.build())
}

fn sweep() -> ShiftDecomposer {
    ShiftDecomposer::new(StrategyKind::Sweep.build())
}

#[test]
fn peak_on_plateau_is_tiled_per_level() {
    let demand = hourly(&[2.0, 2.0, 2.0, 5.0, 5.0, 2.0, 2.0]);
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(2, 3), "")
        .unwrap();

    assert_eq!(blocks, vec![block(2, 0, 3), block(3, 3, 5), block(2, 3, 7)]);

    let covered = coverage(&blocks, Granularity::Hourly);
    for (i, want) in demand.values().iter().enumerate() {
        assert!(covered[i] as f64 >= *want, "interval {i} under-covered");
    }
}

#[test]
fn output_is_ordered_by_start() {
    let demand = hourly(&[0.0, 0.0, 0.0, 0.0, 1.0, 3.0, 3.0, 1.0, 1.0]);
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(1, 4), "")
        .unwrap();
    assert!(blocks.windows(2).all(|w| (w[0].start, w[0].end) <= (w[1].start, w[1].end)));
}

#[test]
fn zero_demand_yields_empty_roster() {
    let blocks = level_set()
        .decompose(&IntervalCurve::zeros(Granularity::HalfHourly), &ShiftConstraints::new(2, 16), "")
        .unwrap();
    assert!(blocks.is_empty());
}

#[test]
fn identical_windows_are_merged() {
    let demand = IntervalCurve::new(Granularity::Hourly, 4.0);
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(1, 24), "agents")
        .unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].count, 4);
    assert_eq!(blocks[0].start, 0);
    assert_eq!(blocks[0].end, ShiftEnd::At(24 * HOUR));
    assert_eq!(blocks[0].skill_level, "agents");
}

#[test]
fn long_run_is_tiled_with_preferred_length() {
    let demand = hourly(&[1.0; 8]);
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(2, 3), "")
        .unwrap();
    assert_eq!(blocks, vec![block(1, 0, 3), block(1, 3, 6), block(1, 6, 8)]);
}

#[test]
fn short_remainder_joins_previous_tile() {
    let demand = hourly(&[1.0; 7]);
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(2, 3), "")
        .unwrap();
    assert_eq!(blocks, vec![block(1, 0, 3), block(1, 3, 7)]);
}

#[test]
fn no_preference_keeps_runs_whole() {
    let demand = hourly(&[0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(0, 0), "")
        .unwrap();
    assert_eq!(blocks, vec![block(1, 1, 11)]);
}

#[test]
fn short_spike_is_stretched_to_minimum() {
    let mut values = vec![0.0; 24];
    values[10] = 3.0;
    let demand = IntervalCurve::from_values(values).unwrap();
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(4, 8), "")
        .unwrap();
    assert_eq!(blocks, vec![block(3, 10, 14)]);
}

#[test]
fn spike_before_midnight_is_stretched_backwards() {
    let mut values = vec![0.0; 24];
    values[23] = 1.0;
    let demand = IntervalCurve::from_values(values).unwrap();
    for decomposer in [level_set(), sweep()] {
        let blocks = decomposer
            .decompose(&demand, &ShiftConstraints::new(3, 8), "")
            .unwrap();
        assert_eq!(blocks, vec![block(1, 21, 24)], "{}", decomposer.strategy_name());
    }
}

#[test]
fn fractional_demand_is_rounded_up() {
    let demand = hourly(&[1.4, 1.6]);
    let blocks = level_set()
        .decompose(&demand, &ShiftConstraints::new(1, 1), "")
        .unwrap();
    assert_eq!(blocks, vec![block(2, 0, 1), block(2, 1, 2)]);
}

#[test]
fn fractional_demand_never_leaves_a_gap() {
    for decomposer in [level_set(), sweep()] {
        let demand = hourly(&[2.4, 0.1, 3.0 + 1e-12]);
        let blocks = decomposer
            .decompose(&demand, &ShiftConstraints::new(1, 1), "")
            .unwrap();
        let covered = coverage(&blocks, Granularity::Hourly);
        assert_eq!(&covered[..4], &[3, 1, 3, 0], "{}", decomposer.strategy_name());
    }
}

#[test]
fn huge_flat_demand_is_staffed_in_bulk() {
    let demand = IntervalCurve::new(Granularity::QuarterHourly, 5_000_000.0);
    for decomposer in [level_set(), sweep()] {
        let blocks = decomposer
            .decompose(&demand, &ShiftConstraints::new(8, 32), "")
            .unwrap();
        assert_eq!(
            blocks,
            vec![block(5_000_000, 0, 8), block(5_000_000, 8, 16), block(5_000_000, 16, 24)],
            "{}",
            decomposer.strategy_name()
        );
    }
}

#[test]
fn huge_staircase_is_staffed_per_step() {
    let demand = hourly(&[3_000_000.0, 3_000_000.0, 1_000_000.0, 1_000_000.0]);
    for decomposer in [level_set(), sweep()] {
        let blocks = decomposer
            .decompose(&demand, &ShiftConstraints::new(1, 24), "")
            .unwrap();
        assert_eq!(
            blocks,
            vec![block(2_000_000, 0, 2), block(1_000_000, 0, 4)],
            "{}",
            decomposer.strategy_name()
        );
    }
}

#[test]
fn open_end_marks_blocks_running_to_midnight() {
    let mut values = vec![0.0; 48];
    for v in &mut values[40..] {
        *v = 2.0;
    }
    let demand = IntervalCurve::from_values(values).unwrap();
    let constraints = ShiftConstraints::new(2, 16).with_open_end(true);
    let blocks = level_set().decompose(&demand, &constraints, "").unwrap();

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].count, 2);
    assert_eq!(blocks[0].start, 40 * 1800);
    assert_eq!(blocks[0].end, ShiftEnd::OpenEnd);
    assert_eq!(blocks[0].length_in(Granularity::HalfHourly), 8);
}

#[test]
fn open_end_leaves_daytime_blocks_alone() {
    let demand = hourly(&[1.0, 1.0, 1.0]);
    let constraints = ShiftConstraints::new(1, 8).with_open_end(true);
    let blocks = level_set().decompose(&demand, &constraints, "").unwrap();
    assert_eq!(blocks, vec![block(1, 0, 3)]);
}

#[test]
fn minimum_above_preferred_is_rejected() {
    let err = level_set()
        .decompose(&hourly(&[1.0]), &ShiftConstraints::new(5, 3), "")
        .unwrap_err();
    assert!(matches!(err, StaffingError::InvalidConstraint { minimum: 5, preferred: 3, .. }));
}

#[test]
fn lengths_beyond_the_day_are_rejected() {
    let demand = hourly(&[1.0]);
    assert!(matches!(
        level_set().decompose(&demand, &ShiftConstraints::new(1, 25), ""),
        Err(StaffingError::InvalidConstraint { .. })
    ));
    assert!(matches!(
        level_set().decompose(&demand, &ShiftConstraints::new(30, 0), ""),
        Err(StaffingError::InvalidConstraint { .. })
    ));
}

#[test]
fn negative_demand_is_rejected() {
    let err = level_set()
        .decompose(&hourly(&[1.0, 2.0, -1.0]), &ShiftConstraints::new(1, 4), "")
        .unwrap_err();
    assert!(matches!(err, StaffingError::NegativeDemand { interval: 2, .. }));
}

#[test]
fn nan_demand_is_rejected() {
    let err = sweep()
        .decompose(&hourly(&[f64::NAN]), &ShiftConstraints::new(1, 4), "")
        .unwrap_err();
    assert!(matches!(err, StaffingError::NegativeDemand { interval: 0, .. }));
}

#[test]
fn sweep_releases_earliest_starters_first() {
    let demand = hourly(&[0.0, 2.0, 2.0, 1.0, 1.0]);
    let blocks = sweep()
        .decompose(&demand, &ShiftConstraints::new(1, 16), "")
        .unwrap();
    assert_eq!(blocks, vec![block(1, 1, 3), block(1, 1, 5)]);
}

#[test]
fn sweep_rotates_at_preferred_length() {
    let demand = IntervalCurve::new(Granularity::Hourly, 2.0);
    let blocks = sweep()
        .decompose(&demand, &ShiftConstraints::new(1, 8), "")
        .unwrap();
    assert_eq!(blocks, vec![block(2, 0, 8), block(2, 8, 16), block(2, 16, 24)]);
}

#[test]
fn sweep_keeps_agents_until_minimum() {
    let demand = hourly(&[0.0, 2.0, 1.0, 1.0, 1.0, 1.0]);
    let blocks = sweep()
        .decompose(&demand, &ShiftConstraints::new(3, 8), "")
        .unwrap();
    for b in &blocks {
        assert!(b.length_in(Granularity::Hourly) >= 3, "{b} is too short");
    }
    let covered = coverage(&blocks, Granularity::Hourly);
    assert!(covered[1] >= 2);
}

#[test]
fn strategies_agree_on_a_simple_step() {
    let demand = hourly(&[0.0, 2.0, 2.0, 1.0, 1.0]);
    let constraints = ShiftConstraints::new(1, 16);
    assert_eq!(
        level_set().decompose(&demand, &constraints, "").unwrap(),
        sweep().decompose(&demand, &constraints, "").unwrap()
    );
}
