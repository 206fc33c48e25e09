pub mod csv_batch;
pub mod json_batch;

pub use csv_batch::parse_csv_batch;
pub use json_batch::parse_json_batch;

use triage_core::ScoringRequest;

use crate::error::IngestError;
use crate::types::BatchFormat;

/// Parse document text in the given format.
pub fn parse_batch(text: &str, format: BatchFormat) -> Result<ScoringRequest, IngestError> {
    match format {
        BatchFormat::Json => parse_json_batch(text),
        BatchFormat::Csv => Ok(ScoringRequest::new(parse_csv_batch(text)?)),
    }
}
