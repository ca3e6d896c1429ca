//! Factor Input
//!
//! Boundary helpers for factor inputs: range validation, scripted rounds
//! loaded from JSON, and seeded autopilot generation. The market itself
//! accepts any values; these run before input reaches it.

use std::fs;
use std::path::Path;

use fx_events::{FactorInputs, FactorSet};

use crate::error::{FactorError, SimulationError};
use crate::noise::NoiseSource;

/// Checks every factor value lies in `[min, max]`.
///
/// Non-finite values are always rejected.
pub fn validate_factor_inputs(inputs: &FactorInputs, min: f64, max: f64) -> Result<(), FactorError> {
    for (code, factors) in inputs {
        for (factor, &value) in factors {
            if !value.is_finite() || value < min || value > max {
                return Err(FactorError::OutOfRange {
                    code: code.clone(),
                    factor: factor.clone(),
                    value,
                    min,
                    max,
                });
            }
        }
    }
    Ok(())
}

/// Draws a value for every factor of every currency from `[min, max]`.
pub fn generate_factor_inputs<N: NoiseSource + ?Sized>(
    codes: &[&str],
    factor_names: &[&str],
    min: f64,
    max: f64,
    noise: &mut N,
) -> FactorInputs {
    codes
        .iter()
        .map(|code| {
            let factors: FactorSet = factor_names
                .iter()
                .map(|name| (name.to_string(), noise.uniform(min, max)))
                .collect();
            (code.to_string(), factors)
        })
        .collect()
}

/// Loads a JSON array of per-round factor inputs.
pub fn load_factor_script(path: impl AsRef<Path>) -> Result<Vec<FactorInputs>, SimulationError> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&content)?)
}
