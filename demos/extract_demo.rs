//! Demonstration of the CPR sensor feature pipeline.
//!
//! This example shows how to:
//! 1. Parse sensor log lines with a fixed reference date
//! 2. Bucket readings into windows and compute features
//! 3. Render both feature sets as CSV for a trainer
//!
//! Run with: cargo run --example extract_demo

use chrono::NaiveDate;
use cpr_sensor_features::{
    ExtractorConfig, FeatureExtractor, FeatureMatrix, FeatureSet, LogParser, OutputFormat,
};
use std::fmt::Write as _;
use std::io::Cursor;

/// Synthesize three seconds of compressions at 50 Hz with a slow heart rate drift.
fn synthetic_log() -> String {
    let mut log = String::new();
    for i in 0..150u32 {
        let millis = i * 20;
        let (secs, ms) = (millis / 1000, millis % 1000);
        let t = f64::from(i) / 50.0;
        let phase = t * std::f64::consts::TAU * 1.8;

        let _ = writeln!(log, "08:15:{secs:02}.{ms:03} [I] Real_Acc_Z: {:.3}", 9.8 * phase.sin());
        let _ = writeln!(log, "08:15:{secs:02}.{ms:03} [I] Real_Acc_X: {:.3}", 0.4 + 0.1 * phase.cos());
        let _ = writeln!(log, "08:15:{secs:02}.{ms:03} [I] Real_Acc_Y: {:.3}", -0.2);
        let _ = writeln!(log, "08:15:{secs:02}.{ms:03} [I] Real_Gyr_X: {:.3}", 0.05 * phase.sin());
        let _ = writeln!(log, "08:15:{secs:02}.{ms:03} [I] Real_Gyr_Y: {:.3}", 0.02 * phase.cos());
        let _ = writeln!(log, "08:15:{secs:02}.{ms:03} [I] Real_Gyr_Z: {:.3}", 0.01);
        if i % 25 == 0 {
            let _ = writeln!(log, "08:15:{secs:02}.{ms:03} [D] Real_HR: {:.0}", 110.0 + t * 2.0);
        }
    }
    log
}

fn main() {
    println!("CPR Sensor Features - Extraction Demo");
    println!("=====================================");
    println!();

    let date = NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date");
    let parser = LogParser::new(date);
    let table = match parser.parse_reader(Cursor::new(synthetic_log())) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error parsing synthetic log: {e}");
            std::process::exit(1);
        }
    };
    println!("Parsed {} observations", table.len());
    println!();

    for feature_set in [FeatureSet::Simple, FeatureSet::Extended] {
        let config = ExtractorConfig::for_feature_set(feature_set);
        let extractor = match FeatureExtractor::new(&config) {
            Ok(extractor) => extractor,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };

        let rows = extractor.extract(&table, 0);
        let matrix = FeatureMatrix::new(feature_set, rows);

        println!(
            "--- {feature_set} ({} ms windows, {} rows) ---",
            config.window_duration().as_millis(),
            matrix.len()
        );
        match matrix.render(OutputFormat::Csv, true) {
            Ok(csv) => print!("{csv}"),
            Err(e) => eprintln!("Error rendering rows: {e}"),
        }
        println!();
    }
}
