//! Foreign Exchange Market
//!
//! Owns the traded currencies, derives the pairwise rate matrix from their
//! strengths and orchestrates round updates.
//!
//! Rates are never stored or perturbed independently: every matrix is
//! recomputed in full from the current strengths, so the diagonal is exactly
//! 1.0 and `rate(a, b) * rate(b, a) == 1` up to rounding.
//!
//! # Example
//!
//! ```
//! use fx_core::{Market, MarketConfig, ScriptedNoise};
//! use fx_events::FactorInputs;
//!
//! let mut market = Market::with_noise(MarketConfig::default(), ScriptedNoise::new([1.0]));
//! market.add_currency("USD", "US Dollar", 1.0);
//! market.add_currency("EUR", "Euro", 1.1);
//! market.calculate_exchange_rates().unwrap();
//!
//! let mut inputs = FactorInputs::new();
//! inputs.insert("EUR".into(), [("interest_rate".to_string(), 0.05)].into());
//! market.update_market(&inputs).unwrap();
//!
//! assert_eq!(market.round(), 1);
//! assert!((market.get_exchange_rate("USD", "EUR").unwrap() - 1.155).abs() < 1e-12);
//! ```

use std::collections::HashMap;

use fx_events::{
    generate_snapshot_id, FactorInputs, MarketEvent, MarketSnapshot, RateMatrix, ShockImpact,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::MarketConfig;
use crate::currency::Currency;
use crate::error::MarketError;
use crate::noise::{NoiseSource, SimRng};

/// Strength given to currencies added without an explicit one.
pub const DEFAULT_STRENGTH: f64 = 1.0;

/// A market of currencies and the rates between them.
#[derive(Debug)]
pub struct Market<N = SimRng> {
    /// Currencies in insertion order (matrix order)
    currencies: Vec<Currency>,
    /// Code to position in `currencies`
    index: HashMap<String, usize>,
    exchange_rates: RateMatrix,
    round: u64,
    rate_history: Vec<RateMatrix>,
    rules: MarketConfig,
    noise: N,
    pending_events: Vec<MarketEvent>,
}

impl Market<SimRng> {
    /// Creates a market with default rules and unseeded noise.
    pub fn new() -> Self {
        Self::with_noise(MarketConfig::default(), SimRng::from_entropy())
    }

    /// Creates a market whose noise is reproducible from `seed`.
    pub fn seeded(rules: MarketConfig, seed: u64) -> Self {
        Self::with_noise(rules, SimRng::seeded(seed))
    }
}

impl Default for Market<SimRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NoiseSource> Market<N> {
    /// Creates an empty market drawing noise from `noise`.
    pub fn with_noise(rules: MarketConfig, noise: N) -> Self {
        Self {
            currencies: Vec::new(),
            index: HashMap::new(),
            exchange_rates: RateMatrix::empty(),
            round: 0,
            rate_history: Vec::new(),
            rules,
            noise,
            pending_events: Vec::new(),
        }
    }

    /// Adds a currency, replacing any existing one with the same code.
    ///
    /// A replaced currency keeps its position in the matrix. New currencies
    /// only appear in the rates after the next recalculation.
    pub fn add_currency(&mut self, code: impl Into<String>, name: impl Into<String>, initial_strength: f64) {
        let currency = Currency::new(code, name, initial_strength);
        match self.index.get(currency.code()) {
            Some(&i) => {
                debug!(code = currency.code(), "Replacing existing currency");
                self.currencies[i] = currency;
            }
            None => {
                self.index.insert(currency.code().to_string(), self.currencies.len());
                self.currencies.push(currency);
            }
        }
    }

    /// Recomputes every rate from current strengths and records the matrix.
    ///
    /// Fails without touching the current matrix if any strength is zero,
    /// negative or not finite.
    pub fn calculate_exchange_rates(&mut self) -> Result<(), MarketError> {
        self.check_strengths()?;

        let codes: Vec<String> = self.currencies.iter().map(|c| c.code().to_string()).collect();
        let rates: Vec<Vec<f64>> = self
            .currencies
            .iter()
            .map(|base| {
                self.currencies
                    .iter()
                    .map(|quote| quote.strength() / base.strength())
                    .collect()
            })
            .collect();

        let matrix = RateMatrix::new(codes, rates);
        self.rate_history.push(matrix.clone());
        self.exchange_rates = matrix;
        Ok(())
    }

    /// Fails on the first currency whose strength is zero, negative or not
    /// finite.
    fn check_strengths(&self) -> Result<(), MarketError> {
        match self
            .currencies
            .iter()
            .find(|c| !(c.strength() > 0.0 && c.strength().is_finite()))
        {
            Some(bad) => Err(MarketError::InvalidStrength {
                code: bad.code().to_string(),
                strength: bad.strength(),
            }),
            None => Ok(()),
        }
    }

    /// Applies one round of factor inputs.
    ///
    /// Advances the round, updates every known currency in the input and
    /// recalculates rates once. Codes the market does not trade are ignored.
    /// A market holding an invalid strength is rejected before the round
    /// advances.
    pub fn update_market(&mut self, factor_inputs: &FactorInputs) -> Result<(), MarketError> {
        self.check_strengths()?;
        self.round += 1;

        let mut updated = Vec::new();
        let mut ignored = Vec::new();
        for (code, factors) in factor_inputs {
            match self.index.get(code) {
                Some(&i) => {
                    self.currencies[i].update_strength(factors.clone(), &self.rules, &mut self.noise);
                    updated.push(code.clone());
                }
                None => {
                    debug!(code = %code, round = self.round, "Ignoring factors for unknown currency");
                    ignored.push(code.clone());
                }
            }
        }

        self.calculate_exchange_rates()?;

        info!(
            round = self.round,
            updated = updated.len(),
            ignored = ignored.len(),
            "Market round complete"
        );
        self.pending_events.push(MarketEvent::RoundCompleted {
            round: self.round,
            updated,
            ignored,
        });
        Ok(())
    }

    /// Looks up the current rate of `quote` in units of `base`.
    pub fn get_exchange_rate(&self, base: &str, quote: &str) -> Result<f64, MarketError> {
        for code in [base, quote] {
            if !self.exchange_rates.contains(code) {
                return Err(MarketError::UnknownCurrency {
                    code: code.to_string(),
                });
            }
        }
        self.exchange_rates
            .rate(base, quote)
            .ok_or_else(|| MarketError::UnknownCurrency {
                code: base.to_string(),
            })
    }

    /// Moves a set of currencies by impacts drawn from `impact_range`.
    ///
    /// Each impact goes through the same per-update clamp as a factor round,
    /// unlike an uncapped shock: a drawn impact of 40% moves strength by at
    /// most `max_change`. Unknown codes are skipped. Rates are recalculated
    /// once afterwards; the round counter does not advance.
    pub fn apply_market_event(
        &mut self,
        name: &str,
        affected: &[String],
        impact_range: (f64, f64),
    ) -> Result<Vec<ShockImpact>, MarketError> {
        self.check_strengths()?;
        info!(event = name, round = self.round, "Market event");

        let mut impacts = Vec::new();
        for code in affected {
            let Some(&i) = self.index.get(code) else {
                debug!(code = %code, event = name, "Market event skips unknown currency");
                continue;
            };
            let impact = self.noise.uniform(impact_range.0, impact_range.1);
            let currency = &mut self.currencies[i];
            let strength_before = currency.strength();
            let strength_after = currency.apply_change(impact, &self.rules);

            info!(code = %code, impact, strength_after, "Impact applied");
            impacts.push(ShockImpact {
                code: code.clone(),
                impact,
                strength_before,
                strength_after,
            });
        }

        self.calculate_exchange_rates()?;
        self.pending_events.push(MarketEvent::MarketShock {
            round: self.round,
            name: name.to_string(),
            impacts: impacts.clone(),
        });
        Ok(impacts)
    }

    /// Moves a currency part of the way toward `target_strength`.
    ///
    /// The bank closes a random share of the gap (drawn from the configured
    /// intervention power band), capped by the per-update clamp. Returns the
    /// strength change actually applied, or `None` for an unknown code. Rates
    /// are recalculated either way.
    pub fn central_bank_intervention(
        &mut self,
        code: &str,
        target_strength: f64,
    ) -> Result<Option<f64>, MarketError> {
        self.check_strengths()?;
        let applied = match self.index.get(code) {
            Some(&i) => {
                let power = self
                    .noise
                    .uniform(self.rules.intervention_power_min, self.rules.intervention_power_max);
                let currency = &mut self.currencies[i];
                let before = currency.strength();
                let wanted = (target_strength - before) * power;
                let after = currency.apply_change(wanted / before, &self.rules);
                let delta = after - before;

                info!(code, target_strength, power, delta, "Central bank intervention");
                self.pending_events.push(MarketEvent::CentralBankIntervention {
                    round: self.round,
                    currency: code.to_string(),
                    target_strength,
                    power,
                    delta,
                });
                Some(delta)
            }
            None => {
                debug!(code, "Intervention for unknown currency");
                None
            }
        };

        self.calculate_exchange_rates()?;
        Ok(applied)
    }

    /// Number of completed factor rounds.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn rules(&self) -> &MarketConfig {
        &self.rules
    }

    /// The most recently calculated matrix.
    pub fn exchange_rates(&self) -> &RateMatrix {
        &self.exchange_rates
    }

    /// Every matrix calculated so far, oldest first.
    pub fn rate_history(&self) -> &[RateMatrix] {
        &self.rate_history
    }

    /// Currencies in matrix order.
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.index.get(code).map(|&i| &self.currencies[i])
    }

    pub fn codes(&self) -> Vec<&str> {
        self.currencies.iter().map(Currency::code).collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Strength history per currency, in matrix order.
    pub fn strength_histories(&self) -> Vec<(&str, &[f64])> {
        self.currencies
            .iter()
            .map(|c| (c.code(), c.history()))
            .collect()
    }

    /// Takes the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<MarketEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Copies the full market state for output.
    pub fn snapshot(&self, run_id: Uuid, triggered_by: &str) -> MarketSnapshot {
        MarketSnapshot {
            snapshot_id: generate_snapshot_id(self.round),
            run_id,
            round: self.round,
            triggered_by: triggered_by.to_string(),
            currencies: self.currencies.iter().map(Currency::snapshot).collect(),
            exchange_rates: self.exchange_rates.clone(),
        }
    }
}
