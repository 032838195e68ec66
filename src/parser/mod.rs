//! Sensor log ingestion.
//!
//! This module turns line-oriented device logs into an ordered table of
//! timestamped observations.

pub mod log_parser;
pub mod types;

// Re-export commonly used types
pub use log_parser::LogParser;
pub use types::{Channel, Observation, ObservationTable};
