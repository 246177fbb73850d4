// crates/search-conformance-http/src/wire.rs
// ============================================================================
// Module: Search Wire Format
// Description: Decoding of the reference service's JSON result pages.
// Purpose: Turn untrusted response bodies into typed result pages.
// Dependencies: search-conformance-core, serde_json
// ============================================================================

//! ## Overview
//! A success body is a JSON object with an integer `found` and an `items`
//! array. Each item carries `id` (string or integer), `name`, an optional
//! `employer.name`, and optional `snippet.requirement` and
//! `snippet.responsibility`. Every other string leaf of the item is kept in
//! document order as additional text so no searchable content is dropped.
//!
//! Security posture: bodies are untrusted; missing or mistyped required
//! fields fail closed as [`TransportError::Malformed`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use search_conformance_core::ResultPage;
use search_conformance_core::ResultRecord;
use search_conformance_core::TransportError;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Item paths decoded into named record fields.
const NAMED_PATHS: [&[&str]; 5] = [
    &["id"],
    &["name"],
    &["employer", "name"],
    &["snippet", "requirement"],
    &["snippet", "responsibility"],
];

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes a success body into a result page.
///
/// # Errors
///
/// Returns [`TransportError::Malformed`] when the body is not JSON or a
/// required field is missing or mistyped.
pub fn decode_page(body: &[u8]) -> Result<ResultPage, TransportError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| TransportError::Malformed(format!("invalid json: {err}")))?;
    let Value::Object(root) = value else {
        return Err(malformed("response body must be an object"));
    };
    let found = root
        .get("found")
        .ok_or_else(|| malformed("missing field `found`"))?
        .as_u64()
        .ok_or_else(|| malformed("`found` must be a non-negative integer"))?;
    let items = match root.get("items") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(malformed("`items` must be an array")),
        None => return Err(malformed("missing field `items`")),
    };
    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_record(index, item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResultPage {
        found,
        records,
    })
}

/// Decodes one item.
fn decode_record(index: usize, item: &Value) -> Result<ResultRecord, TransportError> {
    let Value::Object(fields) = item else {
        return Err(malformed(format!("items[{index}] must be an object")));
    };
    let id = match fields.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) if id.is_u64() || id.is_i64() => id.to_string(),
        Some(_) => return Err(malformed(format!("items[{index}].id must be a string or integer"))),
        None => return Err(malformed(format!("items[{index}] is missing `id`"))),
    };
    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(malformed(format!("items[{index}].name must be a string"))),
        None => return Err(malformed(format!("items[{index}] is missing `name`"))),
    };
    let mut record = ResultRecord::new(id, name);
    if let Some(employer) = optional_text(fields, &["employer", "name"], index)? {
        record = record.with_employer(employer);
    }
    record = record.with_snippet(
        optional_text(fields, &["snippet", "requirement"], index)?,
        optional_text(fields, &["snippet", "responsibility"], index)?,
    );
    let mut path = Vec::new();
    for (key, value) in fields {
        path.push(key.as_str());
        collect_text(value, &mut path, &mut record.additional_text);
        path.pop();
    }
    Ok(record)
}

/// Reads an optional string at `path`; `null` and absence are both `None`.
fn optional_text(
    fields: &Map<String, Value>,
    path: &[&str],
    index: usize,
) -> Result<Option<String>, TransportError> {
    let mut current = fields;
    let Some((last, parents)) = path.split_last() else {
        return Ok(None);
    };
    for parent in parents {
        match current.get(*parent) {
            Some(Value::Object(inner)) => current = inner,
            Some(Value::Null) | None => return Ok(None),
            Some(_) => {
                return Err(malformed(format!("items[{index}].{parent} must be an object")));
            }
        }
    }
    match current.get(*last) {
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(malformed(format!("items[{index}].{} must be a string", path.join(".")))),
    }
}

/// Appends every string leaf not already decoded into a named field.
fn collect_text<'a>(value: &'a Value, path: &mut Vec<&'a str>, out: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            if !NAMED_PATHS.iter().any(|named| *named == path.as_slice()) {
                out.push(text.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_text(item, path, out);
            }
        }
        Value::Object(fields) => {
            for (key, inner) in fields {
                path.push(key.as_str());
                collect_text(inner, path, out);
                path.pop();
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Builds a malformed-response error.
fn malformed(message: impl Into<String>) -> TransportError {
    TransportError::Malformed(message.into())
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
