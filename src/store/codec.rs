//! Line codec for tenant logs.
//!
//! One record is one JSON object on one line. The codec never sees the line
//! separator: `encode` returns the object without a newline and callers strip
//! blank lines before calling `decode`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::store::record::LogRecord;

/// Why a stored line could not be turned back into a record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("unexpected record shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Serialize a record as a single-line JSON object.
pub fn encode(record: &LogRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

/// Parse one non-blank line back into a record.
pub fn decode(line: &[u8]) -> Result<LogRecord, DecodeError> {
    let value: Value = serde_json::from_slice(line).map_err(DecodeError::Syntax)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject(kind_of(&value)));
    }
    LogRecord::deserialize(value).map_err(DecodeError::Shape)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
