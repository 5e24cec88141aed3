// config.rs - Runner configuration, loaded from YAML

use std::path::Path;

use conway::{CellEncoding, Kernel, Rule, Tally};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub rule: RuleConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Board shape and initial state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// Probability of a cell starting alive.
    pub density: f64,
    /// Fixed seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Start from a named pattern instead of random cells.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            density: 0.25,
            seed: None,
            pattern: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleConfig {
    pub birth: u8,
    pub survival: u8,
    #[serde(default)]
    pub encoding: CellEncoding,
    #[serde(default)]
    pub tally: Tally,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            birth: Rule::CONWAY.birth,
            survival: Rule::CONWAY.survival,
            encoding: CellEncoding::default(),
            tally: Tally::default(),
        }
    }
}

impl RuleConfig {
    pub fn kernel(&self) -> Kernel {
        Kernel::new(Rule::new(self.birth, self.survival), self.encoding, self.tally)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Sequential,
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Worker tasks for the parallel backend; defaults to one less than the
    /// available cores.
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Stop after this many generations; run until stopped when unset.
    #[serde(default)]
    pub generations: Option<u64>,
    /// Minimum time between steps, in milliseconds. 0 runs flat out.
    pub interval_ms: u64,
    /// Log population every this many generations.
    pub report_every: u64,
    /// Stop once the board repeats a recent state.
    pub stop_on_cycle: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: Some(1000),
            interval_ms: 0,
            report_every: 100,
            stop_on_cycle: true,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err("world.width and world.height must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.world.density) {
            return Err(format!("world.density {} must be within [0, 1]", self.world.density));
        }
        if let Some(name) = &self.world.pattern {
            conway::Pattern::find(name).map_err(|e| e.to_string())?;
            if self.world.seed.is_some() {
                return Err(format!(
                    "world.seed has no effect when world.pattern `{name}` is set"
                ));
            }
        }
        if self.rule.birth > 8 || self.rule.survival > 8 {
            return Err("rule thresholds must be between 0 and 8".into());
        }
        if self.engine.workers == Some(0) {
            return Err("engine.workers must be at least 1".into());
        }
        if self.run.report_every == 0 {
            return Err("run.report_every must be at least 1".into());
        }
        Ok(())
    }
}
