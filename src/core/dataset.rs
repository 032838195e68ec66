//! Rendering of feature rows as a training table.
//!
//! The trainer reads positional columns, so every format keeps the layout
//! order and puts the label last.

use crate::core::features::{FeatureVector, Label};
use crate::core::layout::{header, FeatureSet};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output encodings understood by the training side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown format '{other}' (expected csv, json or jsonl)")),
        }
    }
}

/// JSON record for one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub window_start: NaiveDateTime,
    pub features: Vec<f64>,
    pub label: Label,
}

impl From<&FeatureVector> for FeatureRecord {
    fn from(fv: &FeatureVector) -> Self {
        Self {
            window_start: fv.window_start,
            features: fv.features.clone(),
            label: fv.label,
        }
    }
}

/// Feature rows of a single feature set, ready for export.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    feature_set: FeatureSet,
    rows: Vec<FeatureVector>,
}

impl FeatureMatrix {
    pub fn new(feature_set: FeatureSet, rows: Vec<FeatureVector>) -> Self {
        debug_assert!(rows.iter().all(|r| r.feature_set == feature_set));
        Self { feature_set, rows }
    }

    pub fn feature_set(&self) -> FeatureSet {
        self.feature_set
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Comma-separated rows, optionally preceded by the column names.
    pub fn to_csv(&self, with_header: bool) -> String {
        let mut out = String::new();
        if with_header {
            out.push_str(&header(self.feature_set).join(","));
            out.push('\n');
        }
        for row in &self.rows {
            let fields: Vec<String> = row.features.iter().map(|v| v.to_string()).collect();
            out.push_str(&format!("{},{}\n", fields.join(","), row.label));
        }
        out
    }

    /// Pretty-printed JSON array of records.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let records: Vec<FeatureRecord> = self.rows.iter().map(FeatureRecord::from).collect();
        serde_json::to_string_pretty(&records)
    }

    /// One JSON array per line, label last.
    pub fn to_jsonl(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&serde_json::to_string(&row.to_row())?);
            out.push('\n');
        }
        Ok(out)
    }

    pub fn render(&self, format: OutputFormat, with_header: bool) -> serde_json::Result<String> {
        match format {
            OutputFormat::Csv => Ok(self.to_csv(with_header)),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Jsonl => self.to_jsonl(),
        }
    }
}
