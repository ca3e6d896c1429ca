//! Exchange Rate Matrix
//!
//! A square table of rates keyed by currency code on both axes.
//! `rate(base, quote)` is the amount of `base` one unit of `quote` buys,
//! expressed as `quote.strength / base.strength` by the engine.
//!
//! # Example
//!
//! ```
//! use fx_events::RateMatrix;
//!
//! let matrix = RateMatrix::new(
//!     vec!["USD".into(), "EUR".into()],
//!     vec![vec![1.0, 1.1], vec![1.0 / 1.1, 1.0]],
//! );
//! assert_eq!(matrix.rate("USD", "EUR"), Some(1.1));
//! assert_eq!(matrix.rate("USD", "GBP"), None);
//! ```

use serde::{Deserialize, Serialize};

/// Square exchange-rate table. Row = base currency, column = quote currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateMatrix {
    codes: Vec<String>,
    rates: Vec<Vec<f64>>,
}

impl RateMatrix {
    /// Builds a matrix from its axis codes and row-major rates.
    ///
    /// Every row must have one entry per code.
    pub fn new(codes: Vec<String>, rates: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(codes.len(), rates.len());
        debug_assert!(rates.iter().all(|row| row.len() == codes.len()));
        Self { codes, rates }
    }

    /// Returns an empty matrix (no currencies).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Currency codes in row/column order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Position of a code on both axes.
    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|c| c == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index_of(code).is_some()
    }

    /// Looks up a single rate by code pair.
    pub fn rate(&self, base: &str, quote: &str) -> Option<f64> {
        let i = self.index_of(base)?;
        let j = self.index_of(quote)?;
        Some(self.rates[i][j])
    }

    /// All quotes against a single base currency.
    pub fn row(&self, base: &str) -> Option<&[f64]> {
        self.index_of(base).map(|i| self.rates[i].as_slice())
    }

    /// Iterates rows as `(base_code, rates)`.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.codes
            .iter()
            .map(String::as_str)
            .zip(self.rates.iter().map(Vec::as_slice))
    }

    /// Copy with every rate rounded to `decimals` places, for display only.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            codes: self.codes.clone(),
            rates: self
                .rates
                .iter()
                .map(|row| row.iter().map(|r| (r * factor).round() / factor).collect())
                .collect(),
        }
    }
}
