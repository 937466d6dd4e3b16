//! Typed errors surfaced to the interactive display.
//!
//! Both kinds are recoverable: the explorer prints them and waits for the next
//! interaction instead of exiting.

use std::path::PathBuf;
use thiserror::Error;

/// The dataset could not be read into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {} as CSV: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no header row", path.display())]
    MissingHeader { path: PathBuf },
}

/// The loaded table cannot feed the detector.
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("required column `{0}` is missing")]
    MissingColumn(String),

    #[error("column `{column}` has non-numeric value {value:?} at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dataset has no rows to score")]
    Empty,
}

/// A detection pass could not run.
#[derive(Debug, Error, PartialEq)]
pub enum DetectError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("contamination must be in (0, 1), got {0}")]
    InvalidContamination(f64),
}
