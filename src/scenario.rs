use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{economy::StructureType, session::Session, state::GameState, state::Severity};

/// Run length when neither the command line nor the scenario sets one.
pub const DEFAULT_TICKS: u64 = 120;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_money() -> f64 {
    GameState::default().money
}

fn default_food() -> f64 {
    GameState::default().food
}

fn default_wood() -> f64 {
    GameState::default().wood
}

fn default_population() -> u64 {
    GameState::default().population
}

fn default_employed() -> u64 {
    GameState::default().employed
}

fn default_income_tax_rate() -> f64 {
    GameState::default().income_tax_rate
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: i32,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub starting: StartingConditions,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub build_orders: Vec<BuildOrder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartingConditions {
    #[serde(default = "default_money")]
    pub money: f64,
    #[serde(default = "default_food")]
    pub food: f64,
    #[serde(default = "default_wood")]
    pub wood: f64,
    #[serde(default = "default_population")]
    pub population: u64,
    #[serde(default = "default_employed")]
    pub employed: u64,
    #[serde(default = "default_income_tax_rate")]
    pub income_tax_rate: f64,
}

impl Default for StartingConditions {
    fn default() -> Self {
        Self {
            money: default_money(),
            food: default_food(),
            wood: default_wood(),
            population: default_population(),
            employed: default_employed(),
            income_tax_rate: default_income_tax_rate(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// A structure to place when the scenario starts. With a non-zero
/// `search_radius` the nearest buildable tile around `(x, y)` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildOrder {
    pub kind: StructureType,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub search_radius: u32,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("scenario must define a name");
        }
        let rate = self.starting.income_tax_rate;
        if !(0.0..=1.0).contains(&rate) {
            anyhow::bail!("income_tax_rate {rate} must lie in [0, 1]");
        }
        if self.starting.food < 0.0 || self.starting.wood < 0.0 {
            anyhow::bail!("starting food and wood must not be negative");
        }
        Ok(())
    }

    pub fn starting_state(&self) -> GameState {
        let start = &self.starting;
        GameState {
            money: start.money,
            food: start.food,
            wood: start.wood,
            population: start.population,
            employed: start.employed,
            income_tax_rate: start.income_tax_rate,
            time: 0,
        }
    }

    /// Fresh session with the scenario's build orders applied. Orders that
    /// cannot be placed are logged and skipped.
    pub fn build_session(&self) -> Session {
        let mut session = Session::new(self.seed, self.starting_state());
        for order in &self.build_orders {
            let site = session
                .world
                .find_site(order.x, order.y, order.search_radius, order.kind);
            match site {
                Some(coord) => {
                    let _ = session.build(coord.x, coord.y, order.kind);
                }
                None => session.add_message(
                    Severity::Warning,
                    format!(
                        "No site for a {} within {} tiles of ({}, {})",
                        order.kind, order.search_radius, order.x, order.y
                    ),
                ),
            }
        }
        session
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(DEFAULT_TICKS)
    }
}
