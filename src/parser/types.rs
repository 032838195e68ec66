//! Observation types produced by the log parser.
//!
//! A sensor log carries one reading per line. Only the time of day, the
//! channel and the raw value survive parsing; no unit conversion is done.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sensor data stream recorded by the wearable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
    HeartRate,
}

impl Channel {
    /// Every channel, in declaration order.
    pub const ALL: [Channel; 7] = [
        Channel::AccelX,
        Channel::AccelY,
        Channel::AccelZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
        Channel::HeartRate,
    ];

    /// Label used for this channel in device logs.
    pub fn log_label(self) -> &'static str {
        match self {
            Channel::AccelX => "Real_Acc_X",
            Channel::AccelY => "Real_Acc_Y",
            Channel::AccelZ => "Real_Acc_Z",
            Channel::GyroX => "Real_Gyr_X",
            Channel::GyroY => "Real_Gyr_Y",
            Channel::GyroZ => "Real_Gyr_Z",
            Channel::HeartRate => "Real_HR",
        }
    }

    /// Look up a channel by its log label.
    pub fn from_log_label(label: &str) -> Option<Self> {
        Channel::ALL.into_iter().find(|c| c.log_label() == label)
    }

    /// Position of this channel in [`Channel::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_label())
    }
}

/// One sensed reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Wall-clock time of day from the log line
    pub time_of_day: NaiveTime,
    /// Reference date joined with `time_of_day`
    pub timestamp: NaiveDateTime,
    /// Channel the reading belongs to
    pub channel: Channel,
    /// Raw magnitude, channel-dependent units
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, time_of_day: NaiveTime, channel: Channel, value: f64) -> Self {
        Self {
            time_of_day,
            timestamp: date.and_time(time_of_day),
            channel,
            value,
        }
    }

    /// Milliseconds since the Unix epoch of the synthetic timestamp.
    pub fn epoch_millis(&self) -> i64 {
        self.timestamp.and_utc().timestamp_millis()
    }
}

/// All observations parsed from one log file, in file line order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    reference_date: NaiveDate,
    observations: Vec<Observation>,
}

impl ObservationTable {
    pub(crate) fn new(reference_date: NaiveDate, observations: Vec<Observation>) -> Self {
        Self {
            reference_date,
            observations,
        }
    }

    /// An explicitly empty table, the result of parsing a missing file.
    pub fn empty(reference_date: NaiveDate) -> Self {
        Self::new(reference_date, Vec::new())
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of observations recorded for `channel`.
    pub fn channel_count(&self, channel: Channel) -> usize {
        self.observations
            .iter()
            .filter(|o| o.channel == channel)
            .count()
    }
}

impl<'a> IntoIterator for &'a ObservationTable {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_label_lookup() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_log_label(channel.log_label()), Some(channel));
        }
        assert_eq!(Channel::from_log_label("Real_Acc_W"), None);
        assert_eq!(Channel::from_log_label("real_acc_x"), None);
    }

    #[test]
    fn test_channel_index_matches_all() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_observation_timestamp() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let time = NaiveTime::from_hms_milli_opt(0, 0, 1, 250).unwrap();
        let obs = Observation::new(date, time, Channel::AccelZ, -0.5);

        assert_eq!(obs.timestamp.date(), date);
        assert_eq!(obs.timestamp.time(), time);
        let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis();
        assert_eq!(obs.epoch_millis() - midnight, 1250);
    }

    #[test]
    fn test_table_channel_count() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let time = NaiveTime::from_hms_milli_opt(12, 0, 0, 0).unwrap();
        let table = ObservationTable::new(
            date,
            vec![
                Observation::new(date, time, Channel::AccelZ, 1.0),
                Observation::new(date, time, Channel::AccelZ, 2.0),
                Observation::new(date, time, Channel::HeartRate, 90.0),
            ],
        );

        assert_eq!(table.len(), 3);
        assert_eq!(table.channel_count(Channel::AccelZ), 2);
        assert_eq!(table.channel_count(Channel::GyroX), 0);
        assert!(ObservationTable::empty(date).is_empty());
    }
}
