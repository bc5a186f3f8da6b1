use crate::decomposer::StrategyKind;
use serde::{Deserialize, Serialize};

/// How rosters are planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub strategy:         StrategyKind,
    /// Convert demand to net agents with the productivity overlay
    /// before decomposing.
    #[serde(default = "default_true")]
    pub use_productivity: bool,
    /// Add the sickness surcharge on top.
    #[serde(default)]
    pub apply_surcharge:  bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy:         StrategyKind::LevelSet,
            use_productivity: true,
            apply_surcharge:  false,
        }
    }
}

impl PlannerConfig {
    /// Load from the data/ directory.
    /// In tests, use PlannerConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/planner/planner_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: PlannerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// Overlays are off so demand curves pass through untouched.
    pub fn default_test() -> Self {
        Self {
            strategy:         StrategyKind::LevelSet,
            use_productivity: false,
            apply_surcharge:  false,
        }
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }
}

fn default_true() -> bool { true }
