//! JSON batch documents.
//!
//! Two shapes are accepted:
//!   [ {task}, {task}, ... ]
//!   { "tasks": [...], "weights": {...}, "strategy": "smart" }

use serde_json::Value;
use tracing::debug;
use triage_core::{RawTask, ScoringRequest};

use crate::error::IngestError;

pub fn parse_json_batch(text: &str) -> Result<ScoringRequest, IngestError> {
    let value: Value = serde_json::from_str(text)?;

    let request = match value {
        Value::Array(_) => {
            let tasks: Vec<RawTask> = serde_json::from_value(value)?;
            ScoringRequest::new(tasks)
        }
        Value::Object(_) => {
            if value.get("tasks").is_none() {
                return Err(IngestError::Shape(
                    "request object has no \"tasks\" field".to_string(),
                ));
            }
            serde_json::from_value(value)?
        }
        other => {
            return Err(IngestError::Shape(format!(
                "expected a task array or request object, got {}",
                json_kind(&other)
            )));
        }
    };

    debug!(tasks = request.tasks.len(), "parsed JSON batch");
    Ok(request)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
