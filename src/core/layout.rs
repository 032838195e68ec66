//! Feature layout: the column order the external trainer keys off.
//!
//! Downstream models index features by position. Any change to the order
//! or membership of a layout must bump [`LAYOUT_VERSION`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current layout version.
pub const LAYOUT_VERSION: u8 = 1;

/// Name of the trailing class label column.
pub const LABEL_COLUMN: &str = "label";

/// Simple feature set, computed over 1 s windows.
pub const SIMPLE_LAYOUT: &[&str] = &[
    "std_dev_z",    // 0: sample std of AccelZ
    "recoil_proxy", // 1: max AccelZ
    "rescuer_hr",   // 2: mean HeartRate
    "tilt_error",   // 3: |(mean AccelX, mean AccelY)|
    "wobble_score", // 4: sample std of GyroX
];

/// Extended feature set, computed over 1.5 s windows.
pub const EXTENDED_LAYOUT: &[&str] = &[
    // === Accelerometer spread (0-2) ===
    "std_dev_x",
    "std_dev_y",
    "std_dev_z",
    // === Accelerometer peaks (3-5) ===
    "recoil_proxy_x",
    "recoil_proxy_y",
    "recoil_proxy",
    // === Shape (6) ===
    "kurtosis_z",
    // === Rescuer (7-8) ===
    "rescuer_hr",
    "tilt_error",
    // === Gyroscope (9-11) ===
    "wobble_score_x",
    "wobble_score_y",
    "wobble_score_z",
];

/// Named feature set selecting both the columns and the default window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSet {
    #[default]
    Simple,
    Extended,
}

impl FeatureSet {
    /// Feature column names, excluding the label.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            FeatureSet::Simple => SIMPLE_LAYOUT,
            FeatureSet::Extended => EXTENDED_LAYOUT,
        }
    }

    pub fn feature_count(self) -> usize {
        self.columns().len()
    }

    /// Width of an output row: features plus the label.
    pub fn row_width(self) -> usize {
        self.feature_count() + 1
    }

    /// Window duration the feature set was designed around, in milliseconds.
    pub fn default_window_ms(self) -> i64 {
        match self {
            FeatureSet::Simple => 1000,
            FeatureSet::Extended => 1500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureSet::Simple => "simple",
            FeatureSet::Extended => "extended",
        }
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(FeatureSet::Simple),
            "extended" => Ok(FeatureSet::Extended),
            other => Err(format!(
                "unknown feature set '{other}' (expected simple or extended)"
            )),
        }
    }
}

/// Position of a feature column, if the set has it.
pub fn feature_index(feature_set: FeatureSet, name: &str) -> Option<usize> {
    feature_set.columns().iter().position(|c| *c == name)
}

/// Full header row including the label column.
pub fn header(feature_set: FeatureSet) -> Vec<&'static str> {
    let mut cols = feature_set.columns().to_vec();
    cols.push(LABEL_COLUMN);
    cols
}

/// Serializable description of a layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub feature_set: FeatureSet,
    pub feature_count: usize,
    pub columns: Vec<String>,
}

impl LayoutInfo {
    pub fn for_set(feature_set: FeatureSet) -> Self {
        Self {
            version: LAYOUT_VERSION,
            feature_set,
            feature_count: feature_set.feature_count(),
            columns: header(feature_set).into_iter().map(String::from).collect(),
        }
    }
}
