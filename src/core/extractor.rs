//! Windowed feature extraction over a parsed observation table.

use crate::config::ExtractorConfig;
use crate::core::features::{compute_features, FeatureVector, Label};
use crate::core::layout::FeatureSet;
use crate::core::windowing::WindowGrid;
use crate::error::Result;
use crate::parser::types::{Channel, ObservationTable};
use tracing::{debug, info};

/// Channel whose sample count decides whether a window is usable.
pub const GATE_CHANNEL: Channel = Channel::AccelZ;

/// Turns an observation table into one feature row per usable window.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    grid: WindowGrid,
    feature_set: FeatureSet,
    min_samples_per_window: usize,
}

impl FeatureExtractor {
    /// Build an extractor, rejecting invalid settings up front.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: WindowGrid::new(config.window_duration())?,
            feature_set: config.feature_set,
            min_samples_per_window: config.min_samples_per_window,
        })
    }

    pub fn feature_set(&self) -> FeatureSet {
        self.feature_set
    }

    pub fn grid(&self) -> &WindowGrid {
        &self.grid
    }

    /// Extract feature rows in chronological window order.
    ///
    /// Windows with fewer than `min_samples_per_window` AccelZ readings are
    /// dropped entirely. Every row carries `label`.
    pub fn extract(&self, table: &ObservationTable, label: Label) -> Vec<FeatureVector> {
        let windows = self.grid.partition(table);
        let total = windows.len();

        let rows: Vec<FeatureVector> = windows
            .iter()
            .filter(|window| {
                let count = window.channel_count(GATE_CHANNEL);
                let keep = count >= self.min_samples_per_window;
                if !keep {
                    debug!(
                        start = %window.start,
                        samples = count,
                        required = self.min_samples_per_window,
                        "dropping sparse window"
                    );
                }
                keep
            })
            .map(|window| compute_features(window, self.feature_set, label))
            .collect();

        info!(
            feature_set = %self.feature_set,
            window_ms = self.grid.duration_ms(),
            windows = total,
            retained = rows.len(),
            "extracted feature rows"
        );
        rows
    }
}
