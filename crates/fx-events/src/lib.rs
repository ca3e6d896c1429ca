//! Shared data types for the FX market simulation.
//!
//! This crate contains pure data structures with no simulation logic:
//! rate matrices, factor sets, snapshots and event records. It is the
//! exchange format between the engine and anything that renders its output.

pub mod event;
pub mod factors;
pub mod rates;
pub mod snapshot;

// Re-export factor types
pub use factors::{FactorInputs, FactorSet, COMMON_FACTORS};

// Re-export rate types
pub use rates::RateMatrix;

// Re-export event types
pub use event::{MarketEvent, ShockImpact};

// Re-export snapshot types
pub use snapshot::{generate_snapshot_id, CurrencySnapshot, MarketSnapshot};
