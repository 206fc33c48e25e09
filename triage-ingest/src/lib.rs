//! triage-ingest: task batch documents (JSON / CSV) into scoring requests.

pub mod error;
pub mod parsers;
pub mod types;

pub use error::IngestError;
pub use parsers::{parse_batch, parse_csv_batch, parse_json_batch};
pub use types::BatchFormat;
