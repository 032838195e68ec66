//! CPR Sensor Features - windowed feature extraction from wearable logs.
//!
//! This library turns accelerometer, gyroscope and heart-rate readings
//! logged by a wearable during CPR into fixed-width feature rows for a
//! decision-tree classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CPR Sensor Features                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │ Log Parser  │──▶│  Windowing  │──▶│  Features   │        │
//! │  │ (regex)     │   │ (1s / 1.5s) │   │ (per chan)  │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │                                             │               │
//! │                                             ▼               │
//! │                                      ┌─────────────┐        │
//! │                                      │   Feature   │        │
//! │                                      │   Matrix    │        │
//! │                                      └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cpr_sensor_features::{features_from_file, Config};
//!
//! let config = Config::default();
//! let rows = features_from_file("session.log", 0, &config).expect("extraction failed");
//! for row in &rows {
//!     println!("{:?}", row.to_row());
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod parser;

use std::path::Path;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, ExtractorConfig};
pub use crate::core::{
    FeatureExtractor, FeatureMatrix, FeatureSet, FeatureVector, Label, OutputFormat, WindowGrid,
};
pub use error::{PipelineError, Result};
pub use parser::{Channel, LogParser, Observation, ObservationTable};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse `path` and extract one labelled feature row per retained window.
///
/// A missing file yields an empty result, not an error.
pub fn features_from_file(
    path: impl AsRef<Path>,
    label: Label,
    config: &Config,
) -> Result<Vec<FeatureVector>> {
    let extractor = FeatureExtractor::new(&config.extractor)?;
    let table = LogParser::new(config.reference_date()).parse_file(path)?;
    Ok(extractor.extract(&table, label))
}
