//! Partitioning of observations into fixed-duration time windows.
//!
//! Windows are half-open intervals `[start, start + duration)` anchored to
//! an epoch grid, so a 1 s window always begins on a whole second no matter
//! when the first reading arrived. Empty windows are never created.

use crate::error::{PipelineError, Result};
use crate::parser::types::{Channel, Observation, ObservationTable};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A time window holding the readings that fell inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorWindow {
    /// Grid index: floor(epoch_ms / duration_ms)
    pub key: i64,
    /// Inclusive start of the window
    pub start: NaiveDateTime,
    /// Exclusive end of the window
    pub end: NaiveDateTime,
    /// Values per channel, indexed like `Channel::ALL`
    samples: [Vec<f64>; 7],
}

impl SensorWindow {
    /// Create a new empty window starting at the given time.
    pub fn new(key: i64, start: NaiveDateTime, duration: Duration) -> Self {
        Self {
            key,
            start,
            end: start + duration,
            samples: Default::default(),
        }
    }

    /// Check if a timestamp falls within this window.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Add an observation's value to its channel.
    pub fn add_observation(&mut self, observation: &Observation) {
        self.samples[observation.channel.index()].push(observation.value);
    }

    /// Values recorded for `channel`, in arrival order.
    pub fn values(&self, channel: Channel) -> &[f64] {
        &self.samples[channel.index()]
    }

    pub fn channel_count(&self, channel: Channel) -> usize {
        self.samples[channel.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.iter().all(Vec::is_empty)
    }

    /// Total number of readings in this window.
    pub fn observation_count(&self) -> usize {
        self.samples.iter().map(Vec::len).sum()
    }

    /// Duration of the window in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }
}

/// Epoch-anchored grid of equal-length windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGrid {
    duration_ms: i64,
}

impl WindowGrid {
    /// Create a grid with the given window length.
    ///
    /// Durations below one millisecond are rejected.
    pub fn new(duration: std::time::Duration) -> Result<Self> {
        let duration_ms = i64::try_from(duration.as_millis()).map_err(|_| {
            PipelineError::Configuration(format!("window duration {duration:?} is too large"))
        })?;
        Self::from_millis(duration_ms)
    }

    pub fn from_millis(duration_ms: i64) -> Result<Self> {
        if duration_ms <= 0 {
            return Err(PipelineError::Configuration(format!(
                "window duration must be at least 1 ms, got {duration_ms} ms"
            )));
        }
        Ok(Self { duration_ms })
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub fn duration(&self) -> Duration {
        Duration::milliseconds(self.duration_ms)
    }

    /// Grid key for a timestamp.
    pub fn key_for(&self, timestamp: NaiveDateTime) -> i64 {
        timestamp
            .and_utc()
            .timestamp_millis()
            .div_euclid(self.duration_ms)
    }

    /// Start of the window containing `timestamp`.
    pub fn window_start(&self, timestamp: NaiveDateTime) -> NaiveDateTime {
        let offset = timestamp
            .and_utc()
            .timestamp_millis()
            .rem_euclid(self.duration_ms);
        timestamp - Duration::milliseconds(offset)
    }

    /// Bucket every observation of `table` into its window.
    ///
    /// The result is ordered by window start, independent of input order,
    /// and contains only non-empty windows.
    pub fn partition(&self, table: &ObservationTable) -> Vec<SensorWindow> {
        let mut buckets: BTreeMap<i64, SensorWindow> = BTreeMap::new();

        for obs in table {
            let key = self.key_for(obs.timestamp);
            buckets
                .entry(key)
                .or_insert_with(|| {
                    SensorWindow::new(key, self.window_start(obs.timestamp), self.duration())
                })
                .add_observation(obs);
        }

        buckets.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    fn obs(secs: u32, millis: u32, channel: Channel, value: f64) -> Observation {
        let time = NaiveTime::from_hms_milli_opt(0, 0, secs, millis).unwrap();
        Observation::new(date(), time, channel, value)
    }

    #[test]
    fn test_window_contains() {
        let start = date().and_hms_opt(0, 0, 0).unwrap();
        let window = SensorWindow::new(0, start, Duration::seconds(1));

        assert!(window.contains(start));
        assert!(window.contains(start + Duration::milliseconds(999)));
        assert!(!window.contains(start + Duration::seconds(1)));
        assert!(!window.contains(start - Duration::milliseconds(1)));
        assert!(window.is_empty());
        assert_eq!(window.duration_secs(), 1.0);
    }

    #[test]
    fn test_grid_rejects_zero_duration() {
        assert!(matches!(
            WindowGrid::new(std::time::Duration::ZERO),
            Err(PipelineError::Configuration(_))
        ));
        assert!(WindowGrid::new(std::time::Duration::from_micros(500)).is_err());
        assert!(WindowGrid::from_millis(-1000).is_err());
    }

    #[test]
    fn test_boundary_belongs_to_next_window() {
        let grid = WindowGrid::from_millis(1000).unwrap();
        let table = ObservationTable::new(
            date(),
            vec![
                obs(0, 0, Channel::AccelZ, 1.0),
                obs(0, 999, Channel::AccelZ, 2.0),
                obs(1, 0, Channel::AccelZ, 3.0),
            ],
        );

        let windows = grid.partition(&table);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].values(Channel::AccelZ), &[1.0, 2.0]);
        assert_eq!(windows[1].values(Channel::AccelZ), &[3.0]);
        assert!(windows[1].contains(obs(1, 0, Channel::AccelZ, 0.0).timestamp));
    }

    #[test]
    fn test_windows_anchor_to_grid_not_first_reading() {
        let grid = WindowGrid::from_millis(1500).unwrap();
        let first = obs(1, 200, Channel::AccelX, 0.0);
        let start = grid.window_start(first.timestamp);

        assert_eq!(start, date().and_hms_milli_opt(0, 0, 0, 0).unwrap());

        let later = obs(1, 600, Channel::AccelX, 0.0);
        assert_eq!(
            grid.window_start(later.timestamp),
            date().and_hms_milli_opt(0, 0, 1, 500).unwrap()
        );
        assert_eq!(grid.key_for(later.timestamp), grid.key_for(first.timestamp) + 1);
    }

    #[test]
    fn test_partition_orders_windows_chronologically() {
        let grid = WindowGrid::from_millis(1000).unwrap();
        let table = ObservationTable::new(
            date(),
            vec![
                obs(5, 0, Channel::AccelZ, 5.0),
                obs(2, 0, Channel::AccelZ, 2.0),
                obs(5, 500, Channel::HeartRate, 80.0),
            ],
        );

        let windows = grid.partition(&table);
        assert_eq!(windows.len(), 2);
        assert!(windows[0].start < windows[1].start);
        assert_eq!(windows[1].observation_count(), 2);
        assert_eq!(windows[1].channel_count(Channel::HeartRate), 1);
    }

    #[test]
    fn test_gaps_produce_no_empty_windows() {
        let grid = WindowGrid::from_millis(1000).unwrap();
        let table = ObservationTable::new(
            date(),
            vec![obs(0, 0, Channel::GyroX, 1.0), obs(30, 0, Channel::GyroX, 1.0)],
        );

        let windows = grid.partition(&table);
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| !w.is_empty()));
    }
}
