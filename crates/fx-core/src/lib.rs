//! FX market simulation engine.
//!
//! Currencies carry a scalar strength that evolves round by round under
//! economic factors and market noise; the market derives the full pairwise
//! exchange-rate matrix from those strengths after every round.
//!
//! # Modules
//!
//! - [`currency`]: Strength state, update rule and history
//! - [`market`]: Currency collection, rate matrix and round orchestration
//! - [`noise`]: Injectable random draws (seeded, midpoint, scripted)
//! - [`interventions`]: Market shocks and central bank interventions
//! - [`simulation`]: Session driver with boundary validation and autopilot
//! - [`output`]: Rate tables and JSON snapshot files

pub mod config;
pub mod currency;
pub mod error;
pub mod events;
pub mod factors;
pub mod interventions;
pub mod market;
pub mod noise;
pub mod output;
pub mod setup;
pub mod simulation;

pub use config::{Config, CurrencyConfig, MarketConfig, SimulationConfig, DEFAULT_TUNING_PATH};
pub use currency::Currency;
pub use error::{ConfigError, FactorError, MarketError, SimulationError};
pub use events::EventLogger;
pub use factors::{generate_factor_inputs, load_factor_script, validate_factor_inputs};
pub use interventions::{apply_intervention, Intervention, InterventionSchedule, InterventionType};
pub use market::{Market, DEFAULT_STRENGTH};
pub use noise::{MidpointNoise, NoiseSource, ScriptedNoise, SimRng};
pub use output::{
    display_rates, render_rate_table, render_summary, SnapshotWriter, DISPLAY_DECIMALS,
};
pub use setup::populate_market;
pub use simulation::Simulation;
