//! Snapshot Types
//!
//! Serialization structs for market snapshots and state output.
//!
//! Snapshots capture the complete state of a market at the end of a round,
//! used for charting, heatmaps and debugging. They are plain copies and never
//! alias the live market.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FactorSet, RateMatrix};

/// Generates a snapshot ID for the given round.
pub fn generate_snapshot_id(round: u64) -> String {
    format!("snap_{:06}", round)
}

/// State of a single currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencySnapshot {
    pub code: String,
    pub name: String,
    pub strength: f64,
    /// Factors applied in the most recent update
    #[serde(default)]
    pub factors: FactorSet,
    /// Strength per update, index 0 is the initial strength
    #[serde(default)]
    pub history: Vec<f64>,
}

impl CurrencySnapshot {
    /// Relative change of the last update, or `None` before the first one.
    pub fn last_change(&self) -> Option<f64> {
        match self.history.as_slice() {
            [.., before, after] => Some((after - before) / before),
            _ => None,
        }
    }
}

/// Full market state at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub snapshot_id: String,
    pub run_id: Uuid,
    pub round: u64,
    pub triggered_by: String,
    pub currencies: Vec<CurrencySnapshot>,
    pub exchange_rates: RateMatrix,
}

impl MarketSnapshot {
    /// Finds a currency by code.
    pub fn currency(&self, code: &str) -> Option<&CurrencySnapshot> {
        self.currencies.iter().find(|c| c.code == code)
    }

    /// Currency with the highest strength.
    pub fn strongest(&self) -> Option<&CurrencySnapshot> {
        self.currencies
            .iter()
            .max_by(|a, b| a.strength.total_cmp(&b.strength))
    }

    /// Currency with the lowest strength.
    pub fn weakest(&self) -> Option<&CurrencySnapshot> {
        self.currencies
            .iter()
            .min_by(|a, b| a.strength.total_cmp(&b.strength))
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
