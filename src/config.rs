//! Configuration for feature extraction runs.

use crate::core::layout::FeatureSet;
use crate::error::PipelineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default minimum number of AccelZ samples a window needs to be kept.
pub const DEFAULT_MIN_SAMPLES: usize = 5;

/// Settings for the windowed feature extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Which feature columns to emit
    pub feature_set: FeatureSet,

    /// Window length; the feature set's default when unset
    #[serde(
        rename = "window_ms",
        with = "duration_ms_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub window_duration: Option<Duration>,

    /// Minimum AccelZ readings for a window to be retained
    pub min_samples_per_window: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::for_feature_set(FeatureSet::default())
    }
}

impl ExtractorConfig {
    /// Settings matching the given feature set's reference pipeline.
    pub fn for_feature_set(feature_set: FeatureSet) -> Self {
        Self {
            feature_set,
            window_duration: None,
            min_samples_per_window: DEFAULT_MIN_SAMPLES,
        }
    }

    /// Effective window length.
    pub fn window_duration(&self) -> Duration {
        self.window_duration.unwrap_or_else(|| {
            Duration::from_millis(self.feature_set.default_window_ms().unsigned_abs())
        })
    }

    /// Reject settings the extractor cannot run with.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.window_duration().as_millis() == 0 {
            return Err(PipelineError::Configuration(format!(
                "window duration must be at least 1 ms, got {:?}",
                self.window_duration()
            )));
        }
        if self.min_samples_per_window == 0 {
            return Err(PipelineError::Configuration(
                "min_samples_per_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main configuration: extractor settings plus the date injected into
/// time-only log timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub extractor: ExtractorConfig,

    /// Calendar date for synthetic timestamps; today when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
}

impl Config {
    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit JSON file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(config)
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cpr-features")
            .join("config.json")
    }

    /// Reference date to stamp observations with.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serde support for an optional Duration stored as milliseconds.
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Option::<u64>::deserialize(deserializer)?;
        Ok(millis.map(Duration::from_millis))
    }
}
