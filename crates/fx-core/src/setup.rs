//! Market Setup
//!
//! Builds the starting market from configuration.

use crate::config::CurrencyConfig;
use crate::error::MarketError;
use crate::market::Market;
use crate::noise::NoiseSource;

/// Adds every configured currency and calculates the initial rates.
pub fn populate_market<N: NoiseSource>(
    market: &mut Market<N>,
    currencies: &[CurrencyConfig],
) -> Result<(), MarketError> {
    for currency in currencies {
        market.add_currency(currency.code.clone(), currency.name.clone(), currency.strength);
    }
    market.calculate_exchange_rates()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_currencies, MarketConfig};
    use crate::noise::MidpointNoise;

    fn default_market() -> Market<MidpointNoise> {
        let mut market = Market::with_noise(MarketConfig::default(), MidpointNoise);
        populate_market(&mut market, &default_currencies()).unwrap();
        market
    }

    #[test]
    fn test_default_market() {
        let market = default_market();

        assert_eq!(market.currencies().len(), 9);
        assert_eq!(
            market.codes(),
            vec!["USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR"]
        );
        assert_eq!(market.rate_history().len(), 1);
        assert_eq!(market.round(), 0);
    }

    #[test]
    fn test_default_relative_strengths() {
        let market = default_market();

        // GBP is the strongest, JPY the weakest
        let gbp = market.currency("GBP").unwrap().strength();
        let jpy = market.currency("JPY").unwrap().strength();
        assert!(market.currencies().iter().all(|c| c.strength() <= gbp));
        assert!(market.currencies().iter().all(|c| c.strength() >= jpy));
        assert!((market.get_exchange_rate("JPY", "USD").unwrap() - 1.0 / 0.009).abs() < 1e-9);
    }
}
