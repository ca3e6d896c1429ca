//! Currency
//!
//! A currency is a single scalar strength plus the record of how it got there.
//! Strength only changes through [`Currency::update_strength`] and
//! [`Currency::apply_change`], both of which commit through the same clamp and
//! append to the history, so `strength == history.last()` always holds.

use fx_events::{CurrencySnapshot, FactorSet};
use tracing::debug;

use crate::config::MarketConfig;
use crate::noise::NoiseSource;

/// A traded currency and its strength history.
#[derive(Debug, Clone)]
pub struct Currency {
    code: String,
    name: String,
    strength: f64,
    factors: FactorSet,
    history: Vec<f64>,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>, initial_strength: f64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            strength: initial_strength,
            factors: FactorSet::new(),
            history: vec![initial_strength],
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Factors applied in the most recent update.
    pub fn factors(&self) -> &FactorSet {
        &self.factors
    }

    /// Strength after every update, starting with the initial strength.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Number of committed strength changes.
    pub fn updates_applied(&self) -> usize {
        self.history.len() - 1
    }

    /// Applies one round of economic factors.
    ///
    /// The factors replace the previous round's. Their sum scales the strength,
    /// a noise draw from the configured band multiplies the result, and the
    /// outcome is clamped to `max_change` of the current strength.
    pub fn update_strength<N: NoiseSource + ?Sized>(
        &mut self,
        factors: FactorSet,
        rules: &MarketConfig,
        noise: &mut N,
    ) {
        let factor_effect: f64 = factors.values().sum();
        self.factors = factors;

        let market_noise = noise.uniform(rules.noise_min, rules.noise_max);
        let candidate = self.strength * (1.0 + factor_effect) * market_noise;

        let committed = self.commit(candidate, rules.max_change);
        debug!(
            code = %self.code,
            factor_effect,
            market_noise,
            candidate,
            strength = committed,
            "Updated currency strength"
        );
    }

    /// Moves strength by a relative `change` (0.05 = +5%), subject to the same
    /// clamp as a factor update. Returns the committed strength.
    pub fn apply_change(&mut self, change: f64, rules: &MarketConfig) -> f64 {
        let candidate = self.strength * (1.0 + change);
        self.commit(candidate, rules.max_change)
    }

    /// Clamps `candidate` around the current strength and appends it.
    fn commit(&mut self, candidate: f64, max_change: f64) -> f64 {
        let lower = self.strength * (1.0 - max_change);
        let upper = self.strength * (1.0 + max_change);

        // NaN cannot be ordered against the bounds; keep the current strength.
        // Comparisons instead of f64::clamp, which panics on unordered bounds.
        let next = if candidate.is_nan() {
            self.strength
        } else if candidate > upper {
            upper
        } else if candidate < lower {
            lower
        } else {
            candidate
        };

        // Bounds overflow near f64::MAX and underflow near zero; strength
        // stays positive and finite either way.
        let next = if next.is_infinite() && next > 0.0 {
            f64::MAX
        } else if !(next > 0.0 && next.is_finite()) {
            self.strength
        } else {
            next
        };

        self.strength = next;
        self.history.push(next);
        next
    }

    /// Copies the current state for output.
    pub fn snapshot(&self) -> CurrencySnapshot {
        CurrencySnapshot {
            code: self.code.clone(),
            name: self.name.clone(),
            strength: self.strength,
            factors: self.factors.clone(),
            history: self.history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{MidpointNoise, ScriptedNoise, SimRng};

    fn factors(pairs: &[(&str, f64)]) -> FactorSet {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_new_currency() {
        let currency = Currency::new("EUR", "Euro", 1.1);
        assert_eq!(currency.code(), "EUR");
        assert_eq!(currency.name(), "Euro");
        assert_eq!(currency.strength(), 1.1);
        assert_eq!(currency.history(), &[1.1]);
        assert!(currency.factors().is_empty());
        assert_eq!(currency.updates_applied(), 0);
    }

    #[test]
    fn test_update_within_limit() {
        let mut currency = Currency::new("EUR", "Euro", 1.1);
        let mut noise = ScriptedNoise::new([1.0]);

        currency.update_strength(
            factors(&[("interest_rate", 0.05)]),
            &MarketConfig::default(),
            &mut noise,
        );

        assert!((currency.strength() - 1.155).abs() < 1e-12);
        assert_eq!(currency.history().len(), 2);
        assert_eq!(currency.history()[1], currency.strength());
    }

    #[test]
    fn test_update_clamped_up() {
        let mut currency = Currency::new("USD", "US Dollar", 1.0);
        let mut noise = ScriptedNoise::new([1.0]);

        currency.update_strength(
            factors(&[("gdp_growth", 0.3), ("inflation", 0.2)]),
            &MarketConfig::default(),
            &mut noise,
        );

        assert!((currency.strength() - 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_update_clamped_down() {
        let mut currency = Currency::new("USD", "US Dollar", 2.0);
        let mut noise = ScriptedNoise::new([0.98]);

        currency.update_strength(
            factors(&[("political_stability", -0.9)]),
            &MarketConfig::default(),
            &mut noise,
        );

        assert!((currency.strength() - 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_applies_after_noise() {
        // 1.14 alone is inside the band; noise pushes it over
        let mut currency = Currency::new("USD", "US Dollar", 1.0);
        let mut noise = ScriptedNoise::new([1.02]);

        currency.update_strength(
            factors(&[("trade_balance", 0.14)]),
            &MarketConfig::default(),
            &mut noise,
        );

        assert!((currency.strength() - 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_factors_replaced_not_merged() {
        let mut currency = Currency::new("GBP", "British Pound", 1.3);
        let rules = MarketConfig::default();

        currency.update_strength(factors(&[("inflation", -0.02)]), &rules, &mut MidpointNoise);
        currency.update_strength(
            factors(&[("market_sentiment", 0.01)]),
            &rules,
            &mut MidpointNoise,
        );

        assert_eq!(currency.factors().len(), 1);
        assert_eq!(currency.factors()["market_sentiment"], 0.01);
    }

    #[test]
    fn test_empty_factors_only_noise() {
        let mut currency = Currency::new("CHF", "Swiss Franc", 1.05);
        let mut noise = ScriptedNoise::new([1.01]);

        currency.update_strength(FactorSet::new(), &MarketConfig::default(), &mut noise);

        assert!((currency.strength() - 1.05 * 1.01).abs() < 1e-12);
    }

    #[test]
    fn test_nan_factor_keeps_strength() {
        let mut currency = Currency::new("INR", "Indian Rupee", 0.014);

        currency.update_strength(
            factors(&[("inflation", f64::NAN)]),
            &MarketConfig::default(),
            &mut MidpointNoise,
        );

        assert_eq!(currency.strength(), 0.014);
        assert_eq!(currency.history().len(), 2);
    }

    #[test]
    fn test_infinite_factor_clamped() {
        let mut currency = Currency::new("AUD", "Australian Dollar", 0.7);

        currency.update_strength(
            factors(&[("gdp_growth", f64::INFINITY)]),
            &MarketConfig::default(),
            &mut MidpointNoise,
        );

        assert!((currency.strength() - 0.7 * 1.15).abs() < 1e-12);
    }

    #[test]
    fn test_history_tracks_updates() {
        let mut currency = Currency::new("CAD", "Canadian Dollar", 0.75);
        let mut rng = SimRng::seeded(42);
        let rules = MarketConfig::default();

        for _ in 0..25 {
            currency.update_strength(factors(&[("inflation", 0.01)]), &rules, &mut rng);
        }

        assert_eq!(currency.history().len(), 26);
        assert_eq!(currency.updates_applied(), 25);
        assert_eq!(*currency.history().last().unwrap(), currency.strength());
        assert_eq!(currency.history()[0], 0.75);
    }

    #[test]
    fn test_overflow_capped_at_max() {
        let mut currency = Currency::new("BIG", "Overflow", 1.7e308);
        let mut noise = ScriptedNoise::new([1.0, 1.0]);
        let rules = MarketConfig::default();

        currency.update_strength(factors(&[("gdp_growth", 0.1)]), &rules, &mut noise);
        assert_eq!(currency.strength(), f64::MAX);

        currency.update_strength(factors(&[("gdp_growth", 0.1)]), &rules, &mut noise);
        assert_eq!(currency.strength(), f64::MAX);
        assert!(currency.history().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_underflow_keeps_strength() {
        let mut currency = Currency::new("TNY", "Tiny", f64::from_bits(1));
        let rules = MarketConfig {
            max_change: 0.99,
            ..MarketConfig::default()
        };

        currency.apply_change(-0.99, &rules);

        assert_eq!(currency.strength(), f64::from_bits(1));
        assert_eq!(currency.history().len(), 2);
    }

    #[test]
    fn test_apply_change() {
        let mut currency = Currency::new("CNY", "Chinese Yuan", 0.15);
        let rules = MarketConfig::default();

        let after = currency.apply_change(0.1, &rules);
        assert!((after - 0.165).abs() < 1e-12);

        let after = currency.apply_change(-0.5, &rules);
        assert!((after - 0.165 * 0.85).abs() < 1e-12);
        assert_eq!(currency.updates_applied(), 2);
    }

    #[test]
    fn test_snapshot_is_copy() {
        let mut currency = Currency::new("JPY", "Japanese Yen", 0.009);
        let snapshot = currency.snapshot();

        currency.apply_change(0.1, &MarketConfig::default());

        assert_eq!(snapshot.strength, 0.009);
        assert_eq!(snapshot.history.len(), 1);
    }
}
