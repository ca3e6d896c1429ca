//! Intervention System
//!
//! Scheduled outside shocks to the market: named market events that move a
//! set of currencies at once, and central bank interventions that push one
//! currency toward a target strength. Interventions are plain JSON so they can
//! be scripted alongside factor inputs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{MarketError, SimulationError};
use crate::market::Market;
use crate::noise::NoiseSource;

/// Types of interventions that can be applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterventionType {
    /// A named event moving each affected currency by a random impact
    MarketEvent {
        name: String,
        affected: Vec<String>,
        impact_min: f64,
        impact_max: f64,
    },
    /// A central bank pushing its currency toward a target strength
    CentralBank {
        currency: String,
        target_strength: f64,
    },
}

/// A complete intervention request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    /// Unique ID for this intervention
    pub id: String,
    /// Round before whose factor update this is applied
    pub round: u64,
    /// Description of why this intervention is being made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The actual intervention to apply
    pub intervention: InterventionType,
}

/// Interventions waiting for their round.
#[derive(Debug, Clone, Default)]
pub struct InterventionSchedule {
    pending: Vec<Intervention>,
}

impl InterventionSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON array of interventions.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let content = fs::read_to_string(path.as_ref())?;
        let interventions: Vec<Intervention> = serde_json::from_str(&content)?;
        let mut schedule = Self::new();
        for intervention in interventions {
            schedule.push(intervention);
        }
        Ok(schedule)
    }

    /// Loads every `*.json` file in `dir` as a single intervention.
    ///
    /// Unreadable or malformed files are skipped with a warning.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let mut schedule = Self::new();
        let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();

        for path in paths {
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<Intervention>(&content) {
                    Ok(intervention) => schedule.push(intervention),
                    Err(e) => warn!("Could not parse intervention file {:?}: {}", path, e),
                },
                Err(e) => warn!("Could not read intervention file {:?}: {}", path, e),
            }
        }
        Ok(schedule)
    }

    pub fn push(&mut self, intervention: Intervention) {
        self.pending.push(intervention);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Removes and returns interventions scheduled at or before `round`,
    /// in the order they were added.
    pub fn take_due(&mut self, round: u64) -> Vec<Intervention> {
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|i| i.round <= round);
        self.pending = later;
        due
    }
}

/// Apply a single intervention and return whether it touched a traded currency
pub fn apply_intervention<N: NoiseSource>(
    market: &mut Market<N>,
    intervention: &Intervention,
) -> Result<bool, MarketError> {
    info!(
        id = %intervention.id,
        reason = intervention.reason.as_deref().unwrap_or(""),
        "Applying intervention"
    );

    match &intervention.intervention {
        InterventionType::MarketEvent {
            name,
            affected,
            impact_min,
            impact_max,
        } => {
            let impacts = market.apply_market_event(name, affected, (*impact_min, *impact_max))?;
            Ok(!impacts.is_empty())
        }
        InterventionType::CentralBank {
            currency,
            target_strength,
        } => {
            let delta = market.central_bank_intervention(currency, *target_strength)?;
            Ok(delta.is_some())
        }
    }
}
