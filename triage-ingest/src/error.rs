//! Ingest error types.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a batch document cannot be turned into a scoring request.
///
/// Only the overall document shape can fail; individual task fields never do.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File extension is not one we know how to read
    #[error("unsupported batch format for {}: expected .json or .csv", path.display())]
    UnknownFormat { path: PathBuf },

    /// Top-level JSON is neither a task array nor a request object
    #[error("invalid batch shape: {0}")]
    Shape(String),

    /// CSV without the header row we map columns from
    #[error("CSV batch has no header row")]
    MissingHeader,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
