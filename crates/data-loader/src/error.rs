//! Error types for the data-loader crate.
//!
//! Only structural problems surface here (unreadable file, broken CSV,
//! missing column). Dirty cell values never do: they are normalized or
//! defaulted while rows are built.

use thiserror::Error;

/// Errors that can occur while loading the investor pool
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader rejected the input (bad quoting, ragged rows, ...)
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A column the ranker depends on is absent from the header row
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// Row couldn't be decoded into a raw investor record
    #[error("Parse error at row {row}: {reason}")]
    ParseError { row: usize, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
