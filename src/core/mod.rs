//! Core functionality for CPR sensor feature extraction.
//!
//! This module contains:
//! - Window management for bucketing observations into time windows
//! - Feature computation from windows
//! - The feature layout shared with the trainer
//! - Rendering of feature rows as a training table

pub mod dataset;
pub mod extractor;
pub mod features;
pub mod layout;
pub mod windowing;

// Re-export commonly used types
pub use dataset::{FeatureMatrix, FeatureRecord, OutputFormat};
pub use extractor::{FeatureExtractor, GATE_CHANNEL};
pub use features::{
    compute_features, excess_kurtosis, sample_std_dev, ChannelSummary, FeatureVector, Label,
    WindowStats,
};
pub use layout::{FeatureSet, LayoutInfo, LABEL_COLUMN, LAYOUT_VERSION};
pub use windowing::{SensorWindow, WindowGrid};
