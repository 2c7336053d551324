//! Records <-> canonical text.
//!
//! Grammar: the empty sequence renders as the empty string. Any other
//! sequence renders as a compact JSON array of objects, keys in sorted order,
//! no insignificant whitespace. String values use JSON escaping, so quotes and
//! apostrophes inside values survive the round trip.

use serde_json::{Map, Value};

use crate::error::{CompactaError, Result};

/// One record: an unordered mapping from string keys to JSON values.
pub type Record = Map<String, Value>;

/// Render `records` as canonical text.
pub fn render(records: &[Record]) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }
    serde_json::to_string(records)
        .map_err(|e| CompactaError::encoding(format!("cannot render records: {e}")))
}

/// Parse canonical text back into records.
pub fn parse(text: &str) -> Result<Vec<Record>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(text)
        .map_err(|e| CompactaError::format(format!("canonical text is not valid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(CompactaError::format("canonical text is not a JSON array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(CompactaError::format(format!(
                "element {i} is not a record (found {})",
                json_type_name(&other)
            ))),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
