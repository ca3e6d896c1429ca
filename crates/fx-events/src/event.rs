//! Market Event Types
//!
//! Structured records of what happened to the market. The engine queues them
//! as it mutates state; drivers drain and log them (one JSON object per line).

use serde::{Deserialize, Serialize};

/// Effect of a shock on a single currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockImpact {
    pub code: String,
    /// Drawn impact before clamping
    pub impact: f64,
    pub strength_before: f64,
    pub strength_after: f64,
}

/// Something that changed the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A factor round was applied and rates recalculated
    RoundCompleted {
        round: u64,
        /// Codes whose strength was updated
        updated: Vec<String>,
        /// Codes in the input that are not traded in this market
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ignored: Vec<String>,
    },
    /// A named event moved a set of currencies at once
    MarketShock {
        round: u64,
        name: String,
        impacts: Vec<ShockImpact>,
    },
    /// A central bank pushed its currency toward a target strength
    CentralBankIntervention {
        round: u64,
        currency: String,
        target_strength: f64,
        /// Fraction of the gap the bank managed to close
        power: f64,
        /// Strength change actually applied
        delta: f64,
    },
}

impl MarketEvent {
    /// Round during which the event happened.
    pub fn round(&self) -> u64 {
        match self {
            MarketEvent::RoundCompleted { round, .. }
            | MarketEvent::MarketShock { round, .. }
            | MarketEvent::CentralBankIntervention { round, .. } => *round,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketEvent::RoundCompleted { .. } => "round_completed",
            MarketEvent::MarketShock { .. } => "market_shock",
            MarketEvent::CentralBankIntervention { .. } => "central_bank_intervention",
        }
    }
}
