//! Error types for the listings pipeline.

use thiserror::Error;

/// Failure to produce a [`Dataset`](crate::data::model::Dataset) from a source.
///
/// Always fatal for the current load: the caller shows it instead of drawing
/// a partial dashboard.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Column '{0}' appears more than once in the header")]
    DuplicateColumn(String),

    #[error("Source has no data rows")]
    Empty,

    #[error("All {rows} rows were excluded during cleaning")]
    NoValidRows { rows: usize },
}

/// Errors raised by filtering, aggregation and export.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid price range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Aggregation called on an empty view")]
    EmptyInput,

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
