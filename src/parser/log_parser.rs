//! Tolerant line-oriented parser for wearable sensor logs.
//!
//! Each line is searched (not anchored) for a `HH:MM:SS.mmm` time token
//! followed somewhere later by a known channel label, a colon and a numeric
//! value:
//!
//! ```text
//! 12:30:45.123 [INFO] Real_Acc_Z: -0.52
//! ```
//!
//! Lines that do not match are skipped. A matched value that is not a
//! number fails the whole parse.

use crate::error::{PipelineError, Result};
use crate::parser::types::{Channel, Observation, ObservationTable};
use chrono::{Local, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2}\.\d{3}).*?(Real_Acc_[XYZ]|Real_Gyr_[XYZ]|Real_HR):\s*([-\d.]+)")
        .expect("sensor line pattern")
});

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Parses sensor logs, stamping every reading with a reference date.
#[derive(Debug, Clone, Copy)]
pub struct LogParser {
    reference_date: NaiveDate,
}

impl LogParser {
    /// Create a parser that joins time-of-day tokens with `reference_date`.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// Create a parser using today's local calendar date.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Parse a log file.
    ///
    /// A file that cannot be opened is logged as `FileNotFound` and yields
    /// an empty table. Callers must treat an empty table as a valid result.
    /// Read failures after a successful open are returned as errors.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ObservationTable> {
        match self.read_file(path) {
            Err(err @ PipelineError::FileNotFound { .. }) => {
                warn!(error = %err, "falling back to an empty observation table");
                Ok(ObservationTable::empty(self.reference_date))
            }
            other => other,
        }
    }

    /// Parse a log file, surfacing `FileNotFound` to the caller.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<ObservationTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PipelineError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let table = self.parse_reader(BufReader::new(file))?;

        debug!(
            path = %path.display(),
            observations = table.len(),
            "parsed sensor log"
        );
        Ok(table)
    }

    /// Parse every line of `reader` in order.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ObservationTable> {
        let mut observations = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(obs) = self.parse_line(&line, idx + 1)? {
                observations.push(obs);
            }
        }

        Ok(ObservationTable::new(self.reference_date, observations))
    }

    /// Parse a single line. `line_number` is only used for error reports.
    ///
    /// Returns `Ok(None)` when the line carries no recognizable reading.
    pub fn parse_line(&self, line: &str, line_number: usize) -> Result<Option<Observation>> {
        let Some(caps) = LINE_PATTERN.captures(line) else {
            return Ok(None);
        };

        let time_token = &caps[1];
        let label = &caps[2];
        let value_token = &caps[3];

        let channel = Channel::from_log_label(label).ok_or_else(|| {
            PipelineError::malformed(line_number, label, "unrecognized channel label")
        })?;

        let time_of_day = NaiveTime::parse_from_str(time_token, TIME_FORMAT)
            .map_err(|e| PipelineError::malformed(line_number, time_token, e))?;

        let value: f64 = value_token
            .parse()
            .map_err(|e| PipelineError::malformed(line_number, value_token, e))?;
        if !value.is_finite() {
            return Err(PipelineError::malformed(
                line_number,
                value_token,
                "value out of range",
            ));
        }

        Ok(Some(Observation::new(
            self.reference_date,
            time_of_day,
            channel,
            value,
        )))
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::today()
    }
}
