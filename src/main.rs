//! CPR Sensor Features CLI
//!
//! Extracts labelled feature rows from a wearable sensor log.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cpr_sensor_features::{
    config::Config,
    core::{layout::LayoutInfo, FeatureExtractor, FeatureMatrix, FeatureSet, OutputFormat},
    parser::LogParser,
    Label, VERSION,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cpr-features")]
#[command(version = VERSION)]
#[command(about = "Windowed feature extraction from wearable CPR sensor logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract labelled feature rows from a sensor log
    Extract {
        /// Sensor log to read
        file: PathBuf,

        /// Class label attached to every row (e.g. 0 good, 1 leaning, 2 tired)
        #[arg(long, short)]
        label: Label,

        /// Feature set to compute (simple or extended)
        #[arg(long)]
        feature_set: Option<FeatureSet>,

        /// Window length in milliseconds (defaults to the feature set's window)
        #[arg(long)]
        window_ms: Option<u64>,

        /// Minimum AccelZ samples for a window to be kept
        #[arg(long)]
        min_samples: Option<usize>,

        /// Date joined with log times, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output format (csv, json or jsonl)
        #[arg(long, default_value = "csv")]
        format: OutputFormat,

        /// Emit a header row (csv only)
        #[arg(long)]
        header: bool,

        /// Configuration file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the column layout of a feature set
    Layout {
        #[arg(long, default_value = "simple")]
        feature_set: FeatureSet,
    },

    /// Show the effective configuration
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            file,
            label,
            feature_set,
            window_ms,
            min_samples,
            date,
            format,
            header,
            config,
        } => load_config(config.as_deref()).and_then(|mut cfg| {
            if let Some(feature_set) = feature_set {
                cfg.extractor.feature_set = feature_set;
            }
            if let Some(ms) = window_ms {
                cfg.extractor.window_duration = Some(Duration::from_millis(ms));
            }
            if let Some(min) = min_samples {
                cfg.extractor.min_samples_per_window = min;
            }
            if date.is_some() {
                cfg.reference_date = date;
            }
            cmd_extract(&file, label, &cfg, format, header)
        }),
        Commands::Layout { feature_set } => cmd_layout(feature_set),
        Commands::Config { config } => cmd_config(config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays a clean table.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path).context("loading --config file"),
        None => Config::load().context("loading default config"),
    }
}

fn cmd_extract(
    file: &Path,
    label: Label,
    config: &Config,
    format: OutputFormat,
    header: bool,
) -> anyhow::Result<()> {
    let extractor = FeatureExtractor::new(&config.extractor)?;
    let parser = LogParser::new(config.reference_date());

    let table = parser
        .parse_file(file)
        .with_context(|| format!("parsing {}", file.display()))?;
    if table.is_empty() {
        tracing::warn!(path = %file.display(), "no sensor readings found");
    }

    let rows = extractor.extract(&table, label);
    let matrix = FeatureMatrix::new(extractor.feature_set(), rows);
    print!("{}", matrix.render(format, header)?);

    Ok(())
}

fn cmd_layout(feature_set: FeatureSet) -> anyhow::Result<()> {
    let info = LayoutInfo::for_set(feature_set);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn cmd_config(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(path)?;
    config.extractor.validate()?;
    let source = path.map_or_else(Config::config_path, Path::to_path_buf);

    println!("CPR Sensor Features v{VERSION}");
    println!("Config file: {}", source.display());
    println!(
        "Effective window: {} ms",
        config.extractor.window_duration().as_millis()
    );
    println!("Reference date: {}", config.reference_date());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
