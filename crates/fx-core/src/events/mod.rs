//! Event logging for market events.

pub mod logger;

pub use logger::EventLogger;
