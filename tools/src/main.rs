//! shift-planner: headless roster planner for callcenter staffing models.
//!
//! Usage:
//!   shift-planner --model data/models/example_model.json
//!   shift-planner --model data/models/example_model.json --json
//!   shift-planner --model data/models/example_model.json --scale 0.5
//!   shift-planner --model data/models/example_model.json --callcenter leipzig
//!   shift-planner --synthetic-seed 12345

use anyhow::Result;
use staffing_core::{
    config::PlannerConfig,
    curve::Granularity,
    model::{AgentGroup, Callcenter, CallcenterModel},
    planner::{CallcenterRoster, RosterPlanner},
    rng::DemandRng,
    scale::ScaleTransform,
    shift::format_clock,
    staffing::StaffingSpec,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let model_path = string_arg(&args, "--model");
    let synthetic_seed: Option<u64> = string_arg(&args, "--synthetic-seed").and_then(|s| s.parse().ok());
    let scale: Option<f64> = string_arg(&args, "--scale").and_then(|s| s.parse().ok());
    let only_callcenter = string_arg(&args, "--callcenter");

    let config = match PlannerConfig::load(data_dir) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; using built-in planner defaults");
            PlannerConfig::default()
        }
    };

    let model = match (model_path, synthetic_seed) {
        (Some(path), _) => CallcenterModel::load(path)?,
        (None, Some(seed)) => synthetic_model(seed),
        (None, None) => CallcenterModel::load(format!("{data_dir}/models/example_model.json"))?,
    };

    if let Some(ratio) = scale {
        let scaled = ScaleTransform::new(ratio)?.model(&model)?;
        println!("{}", serde_json::to_string_pretty(&scaled)?);
        return Ok(());
    }

    let planner = RosterPlanner::new(&model, config.clone());
    let rosters = match only_callcenter {
        Some(name) => vec![planner.plan_callcenter(model.callcenter_named(name)?)?],
        None => planner.plan_model()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&rosters)?);
    } else {
        println!("shift-planner");
        println!("  model:        {}", if model.name.is_empty() { "<unnamed>" } else { model.name.as_str() });
        println!("  strategy:     {:?}", config.strategy);
        println!("  productivity: {}", on_off(config.use_productivity));
        println!("  surcharge:    {}", on_off(config.apply_surcharge));
        println!();
        for roster in &rosters {
            print_roster(roster);
        }
    }
    Ok(())
}

fn print_roster(roster: &CallcenterRoster) {
    println!("=== {} ===", roster.callcenter);
    for group in &roster.groups {
        println!("  group #{} ({})", group.group_index + 1, group.skill_level);
        for block in &group.blocks {
            println!("    {block}");
        }
    }
    println!("  agents:      {}", roster.agent_count());
    println!("  agent-hours: {:.1}", roster.agent_hours());

    let coverage = roster.coverage(Granularity::Hourly);
    let busy: Vec<String> = coverage
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .map(|(h, c)| format!("{}={c}", format_clock(h as u32 * 3600)))
        .collect();
    if !busy.is_empty() {
        println!("  coverage:    {}", busy.join(" "));
    }
    println!();
}

/// A one-callcenter model with a synthetic demand curve, for demos.
fn synthetic_model(seed: u64) -> CallcenterModel {
    let mut rng = DemandRng::new(seed);
    let granularity = rng.granularity();
    let peak = 5 + rng.next_u64_below(20) as u32;
    let demand = rng.demand_curve(granularity, peak);

    let callcenter = Callcenter::new(format!("synthetic-{seed}"))
        .with_group(AgentGroup::new("general", StaffingSpec::distribution(demand)));
    CallcenterModel {
        name: format!("synthetic-{seed}"),
        callcenters: vec![callcenter],
        ..CallcenterModel::default()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
