//! Feature computation from sensor windows.
//!
//! Every statistic tolerates missing channels: an absent channel
//! contributes 0.0 rather than NaN so rows stay dense for the trainer.

use crate::core::layout::FeatureSet;
use crate::core::windowing::SensorWindow;
use crate::parser::types::Channel;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Class label attached to every row of one extraction run.
pub type Label = u32;

/// Summary statistics for one channel within one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean, 0.0 when empty
    pub mean: f64,
    /// Largest value, 0.0 when empty
    pub max: f64,
    /// Sample standard deviation (n - 1), 0.0 below two samples
    pub std_dev: f64,
    /// Population standard deviation (n), 0.0 when empty
    pub population_std_dev: f64,
    /// Fisher excess kurtosis, 0.0 below four samples or on a flat signal
    pub kurtosis: f64,
}

impl ChannelSummary {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: mean_or_zero(values),
            max: max_or_zero(values),
            std_dev: sample_std_dev(values),
            population_std_dev: population_std_dev(values),
            kurtosis: excess_kurtosis(values),
        }
    }
}

/// Per-channel summaries for a whole window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowStats {
    pub start: NaiveDateTime,
    channels: [ChannelSummary; 7],
}

impl WindowStats {
    pub fn from_window(window: &SensorWindow) -> Self {
        Self {
            start: window.start,
            channels: Channel::ALL.map(|c| ChannelSummary::from_values(window.values(c))),
        }
    }

    pub fn channel(&self, channel: Channel) -> &ChannelSummary {
        &self.channels[channel.index()]
    }

    /// Magnitude of the mean planar (X/Y) acceleration bias.
    pub fn tilt_error(&self) -> f64 {
        let mean_x = self.channel(Channel::AccelX).mean;
        let mean_y = self.channel(Channel::AccelY).mean;
        (mean_x.powi(2) + mean_y.powi(2)).sqrt()
    }

    pub fn rescuer_hr(&self) -> f64 {
        self.channel(Channel::HeartRate).mean
    }

    /// Feature values in the column order of `feature_set`.
    pub fn feature_values(&self, feature_set: FeatureSet) -> Vec<f64> {
        let x = self.channel(Channel::AccelX);
        let y = self.channel(Channel::AccelY);
        let z = self.channel(Channel::AccelZ);

        match feature_set {
            FeatureSet::Simple => vec![
                z.std_dev,
                z.max,
                self.rescuer_hr(),
                self.tilt_error(),
                self.channel(Channel::GyroX).std_dev,
            ],
            FeatureSet::Extended => vec![
                x.std_dev,
                y.std_dev,
                z.std_dev,
                x.max,
                y.max,
                z.max,
                z.kurtosis,
                self.rescuer_hr(),
                self.tilt_error(),
                self.channel(Channel::GyroX).std_dev,
                self.channel(Channel::GyroY).std_dev,
                self.channel(Channel::GyroZ).std_dev,
            ],
        }
    }
}

/// One output row: window features followed by the class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Start of the window the row summarizes
    pub window_start: NaiveDateTime,
    pub feature_set: FeatureSet,
    /// Values in `feature_set.columns()` order
    pub features: Vec<f64>,
    pub label: Label,
}

impl FeatureVector {
    /// Feature values with the label appended as the final element.
    pub fn to_row(&self) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.features.len() + 1);
        row.extend_from_slice(&self.features);
        row.push(f64::from(self.label));
        row
    }

    /// Look up a feature by column name.
    pub fn get(&self, name: &str) -> Option<f64> {
        crate::core::layout::feature_index(self.feature_set, name)
            .and_then(|i| self.features.get(i).copied())
    }
}

/// Compute the feature row for a window.
pub fn compute_features(
    window: &SensorWindow,
    feature_set: FeatureSet,
    label: Label,
) -> FeatureVector {
    let stats = WindowStats::from_window(window);
    FeatureVector {
        window_start: window.start,
        feature_set,
        features: stats.feature_values(feature_set),
        label,
    }
}

pub fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::mean(values.iter())
}

pub fn max_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::max(values.iter())
}

/// Sample standard deviation with an n - 1 denominator.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    Statistics::std_dev(values.iter())
}

/// Population standard deviation with an n denominator.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Statistics::population_std_dev(values.iter())
}

/// Fisher (excess) kurtosis: `mean((x - μ)^4) / σ^4 - 3`.
///
/// μ and σ are population moments. Fewer than four samples or a flat
/// signal yield 0.0; a normal distribution yields roughly 0.0 as well.
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 || values.iter().all(|&v| v == values[0]) {
        return 0.0;
    }

    let mu: f64 = Statistics::mean(values.iter());
    let sigma: f64 = Statistics::population_std_dev(values.iter());
    if sigma == 0.0 || !sigma.is_finite() {
        return 0.0;
    }

    let fourth_moment = values.iter().map(|&x| (x - mu).powi(4)).sum::<f64>() / n as f64;
    fourth_moment / sigma.powi(4) - 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::windowing::WindowGrid;
    use crate::parser::types::{Observation, ObservationTable};
    use chrono::{NaiveDate, NaiveTime};

    fn window_with(readings: &[(Channel, f64)]) -> SensorWindow {
        let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let observations = readings
            .iter()
            .enumerate()
            .map(|(i, &(channel, value))| {
                let time = NaiveTime::from_hms_milli_opt(9, 0, 0, i as u32 * 10).unwrap();
                Observation::new(date, time, channel, value)
            })
            .collect();
        let table = ObservationTable::new(date, observations);
        let mut windows = WindowGrid::from_millis(1000).unwrap().partition(&table);
        assert_eq!(windows.len(), 1);
        windows.remove(0)
    }

    #[test]
    fn test_sample_std_dev_of_one_to_five() {
        let sd = sample_std_dev(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((sd - 1.5811).abs() < 1e-4);
    }

    #[test]
    fn test_std_dev_degenerate_inputs() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[4.2]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(population_std_dev(&[4.2]), 0.0);
    }

    #[test]
    fn test_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_kurtosis_flat_signal_is_zero() {
        assert_eq!(excess_kurtosis(&[2.0; 4]), 0.0);
        assert_eq!(excess_kurtosis(&[2.0; 50]), 0.0);
    }

    #[test]
    fn test_kurtosis_needs_four_samples() {
        assert_eq!(excess_kurtosis(&[]), 0.0);
        assert_eq!(excess_kurtosis(&[1.0, 5.0, 9.0]), 0.0);
    }

    #[test]
    fn test_kurtosis_formula() {
        // Two-point symmetric distribution: m4 / σ^4 = 1, so excess = -2.
        let k = excess_kurtosis(&[-1.0, 1.0, -1.0, 1.0]);
        assert!((k + 2.0).abs() < 1e-12);

        // 1..=5: μ = 3, σ² = 2, m4 = 6.8 → 6.8 / 4 - 3 = -1.3
        let k = excess_kurtosis(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((k + 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_tilt_error_three_four_five() {
        let window = window_with(&[
            (Channel::AccelX, 3.0),
            (Channel::AccelX, 3.0),
            (Channel::AccelY, 4.0),
        ]);
        let stats = WindowStats::from_window(&window);
        assert_eq!(stats.tilt_error(), 5.0);
    }

    #[test]
    fn test_missing_channels_substitute_zero() {
        let window = window_with(&[(Channel::AccelZ, 1.0), (Channel::AccelZ, 2.0)]);
        let stats = WindowStats::from_window(&window);

        assert_eq!(stats.tilt_error(), 0.0);
        assert_eq!(stats.rescuer_hr(), 0.0);
        assert_eq!(*stats.channel(Channel::GyroX), ChannelSummary::default());
        assert!(stats
            .feature_values(FeatureSet::Extended)
            .iter()
            .all(|v| v.is_finite()));
    }

    #[test]
    fn test_simple_feature_order() {
        let window = window_with(&[
            (Channel::AccelZ, 1.0),
            (Channel::AccelZ, 2.0),
            (Channel::AccelZ, 3.0),
            (Channel::AccelZ, 4.0),
            (Channel::AccelZ, 5.0),
            (Channel::HeartRate, 100.0),
            (Channel::HeartRate, 110.0),
            (Channel::GyroX, 1.0),
            (Channel::GyroX, 3.0),
        ]);

        let fv = compute_features(&window, FeatureSet::Simple, 2);
        assert_eq!(fv.features.len(), FeatureSet::Simple.feature_count());
        assert!((fv.features[0] - 1.5811).abs() < 1e-4);
        assert_eq!(fv.features[1], 5.0);
        assert_eq!(fv.features[2], 105.0);
        assert_eq!(fv.features[3], 0.0);
        assert!((fv.features[4] - std::f64::consts::SQRT_2).abs() < 1e-12);

        let row = fv.to_row();
        assert_eq!(row.len(), FeatureSet::Simple.row_width());
        assert_eq!(row.last(), Some(&2.0));
    }

    #[test]
    fn test_extended_wobble_axes_use_their_own_channels() {
        let window = window_with(&[
            (Channel::AccelZ, 1.0),
            (Channel::GyroX, 0.0),
            (Channel::GyroX, 2.0),
            (Channel::GyroY, 0.0),
            (Channel::GyroY, 4.0),
            (Channel::GyroZ, 0.0),
            (Channel::GyroZ, 8.0),
        ]);

        let fv = compute_features(&window, FeatureSet::Extended, 0);
        let wx = fv.get("wobble_score_x").unwrap();
        let wy = fv.get("wobble_score_y").unwrap();
        let wz = fv.get("wobble_score_z").unwrap();
        assert!((wy - 2.0 * wx).abs() < 1e-12);
        assert!((wz - 4.0 * wx).abs() < 1e-12);
    }

    #[test]
    fn test_extended_peaks_per_axis() {
        let window = window_with(&[
            (Channel::AccelX, -2.0),
            (Channel::AccelX, 0.5),
            (Channel::AccelY, 7.0),
            (Channel::AccelZ, -9.0),
            (Channel::AccelZ, -3.0),
        ]);

        let fv = compute_features(&window, FeatureSet::Extended, 1);
        assert_eq!(fv.get("recoil_proxy_x"), Some(0.5));
        assert_eq!(fv.get("recoil_proxy_y"), Some(7.0));
        assert_eq!(fv.get("recoil_proxy"), Some(-3.0));
        assert_eq!(fv.get("kurtosis_z"), Some(0.0));
    }
}
