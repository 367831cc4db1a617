//! Error types for the batch adapter and CLI.
//!
//! The engine itself never fails; these cover reading requests and writing output.

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while reading loan requests or writing schedules.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input file, or to write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: amortize <loans.csv> [--summary]")]
    MissingArgument,

    /// Unrecognized command-line option
    #[error("Unknown option '{0}'. Usage: amortize <loans.csv> [--summary]")]
    UnknownOption(String),
}
