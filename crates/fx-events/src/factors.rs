//! Factor Types
//!
//! Economic factors are plain name/value pairs. The set of names is open:
//! the engine sums whatever it is given.

use std::collections::BTreeMap;

/// Factor name to value for a single currency.
pub type FactorSet = BTreeMap<String, f64>;

/// Currency code to factor set for a single round.
pub type FactorInputs = BTreeMap<String, FactorSet>;

/// The conventional factor names offered to players.
pub const COMMON_FACTORS: [&str; 6] = [
    "interest_rate",
    "inflation",
    "gdp_growth",
    "political_stability",
    "trade_balance",
    "market_sentiment",
];
