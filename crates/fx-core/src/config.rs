//! Configuration System
//!
//! Loads tuning parameters from fx_tuning.toml for easy adjustment without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use crate::error::ConfigError;

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "fx_tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default = "default_currencies")]
    pub currencies: Vec<CurrencyConfig>,
}

/// Strength update rule parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Maximum relative strength change per update
    pub max_change: f64,
    /// Lower bound of the multiplicative noise band
    pub noise_min: f64,
    /// Upper bound of the multiplicative noise band
    pub noise_max: f64,
    /// Smallest share of the gap a central bank intervention closes
    pub intervention_power_min: f64,
    /// Largest share of the gap a central bank intervention closes
    pub intervention_power_max: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            max_change: 0.15,
            noise_min: 0.98,
            noise_max: 1.02,
            intervention_power_min: 0.3,
            intervention_power_max: 0.7,
        }
    }
}

/// Driver parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_rounds: u64,
    pub seed: u64,
    /// Smallest factor value accepted at the input boundary
    pub factor_min: f64,
    /// Largest factor value accepted at the input boundary
    pub factor_max: f64,
    /// Rounds between JSON snapshots
    pub snapshot_interval: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_rounds: 10,
            seed: 42,
            factor_min: -0.1,
            factor_max: 0.1,
            snapshot_interval: 1,
        }
    }
}

/// A currency traded from the start of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub code: String,
    pub name: String,
    #[serde(default = "default_strength")]
    pub strength: f64,
}

impl CurrencyConfig {
    pub fn new(code: impl Into<String>, name: impl Into<String>, strength: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            strength,
        }
    }
}

fn default_strength() -> f64 {
    crate::market::DEFAULT_STRENGTH
}

/// The nine currencies of the default market, with rough relative strengths.
pub fn default_currencies() -> Vec<CurrencyConfig> {
    vec![
        CurrencyConfig::new("USD", "US Dollar", 1.0),
        CurrencyConfig::new("EUR", "Euro", 1.1),
        CurrencyConfig::new("GBP", "British Pound", 1.3),
        CurrencyConfig::new("JPY", "Japanese Yen", 0.009),
        CurrencyConfig::new("AUD", "Australian Dollar", 0.7),
        CurrencyConfig::new("CAD", "Canadian Dollar", 0.75),
        CurrencyConfig::new("CHF", "Swiss Franc", 1.05),
        CurrencyConfig::new("CNY", "Chinese Yuan", 0.15),
        CurrencyConfig::new("INR", "Indian Rupee", 0.014),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            simulation: SimulationConfig::default(),
            currencies: default_currencies(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default path, or use defaults if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_TUNING_PATH).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", DEFAULT_TUNING_PATH, e);
            Self::default()
        })
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let market = &self.market;
        if !(market.max_change >= 0.0 && market.max_change < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "market.max_change must be in [0, 1), got {}",
                market.max_change
            )));
        }
        if !(market.noise_min > 0.0 && market.noise_min <= market.noise_max)
            || !market.noise_max.is_finite()
        {
            return Err(ConfigError::Invalid(format!(
                "market noise band [{}, {}] must be positive and ordered",
                market.noise_min, market.noise_max
            )));
        }
        if !(market.intervention_power_min >= 0.0
            && market.intervention_power_min <= market.intervention_power_max
            && market.intervention_power_max <= 1.0)
        {
            return Err(ConfigError::Invalid(format!(
                "intervention power [{}, {}] must be an ordered range within [0, 1]",
                market.intervention_power_min, market.intervention_power_max
            )));
        }

        let sim = &self.simulation;
        if !(sim.factor_min <= sim.factor_max) {
            return Err(ConfigError::Invalid(format!(
                "simulation factor range [{}, {}] is inverted",
                sim.factor_min, sim.factor_max
            )));
        }
        if sim.snapshot_interval == 0 {
            return Err(ConfigError::Invalid(
                "simulation.snapshot_interval must be at least 1".to_string(),
            ));
        }

        if self.currencies.is_empty() {
            return Err(ConfigError::Invalid("no currencies configured".to_string()));
        }
        for currency in &self.currencies {
            if !(currency.strength > 0.0 && currency.strength.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "currency {} has non-positive strength {}",
                    currency.code, currency.strength
                )));
            }
        }

        Ok(())
    }
}
