//! Error types for the parsing and extraction pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a sensor log into feature vectors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input log does not exist or could not be opened.
    ///
    /// `LogParser::parse_file` recovers from this locally and returns an
    /// empty table; only `LogParser::read_file` surfaces it.
    #[error("log file not found or unopenable: {path}: {source}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line matched the channel/value grammar but a captured token could
    /// not be converted.
    #[error("malformed value {token:?} on line {line}: {reason}")]
    MalformedValue {
        line: usize,
        token: String,
        reason: String,
    },

    /// Invalid extractor settings, rejected before any processing.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Read failure after the input was opened, e.g. non-UTF-8 content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn malformed(line: usize, token: &str, reason: impl ToString) -> Self {
        PipelineError::MalformedValue {
            line,
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
