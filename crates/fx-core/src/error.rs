//! Error types for the market engine and its driver.

use thiserror::Error;

/// Errors raised by market operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Unknown currency: {code}")]
    UnknownCurrency { code: String },

    #[error("Invalid strength {strength} for {code}: must be positive and finite")]
    InvalidStrength { code: String, strength: f64 },
}

/// Errors raised when validating factor input at the boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactorError {
    #[error("Factor {factor} for {code} is {value}, expected a value in [{min}, {max}]")]
    OutOfRange {
        code: String,
        factor: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors surfaced by the simulation driver.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Factor error: {0}")]
    Factor(#[from] FactorError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
