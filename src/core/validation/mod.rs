//! Record validation against the permit schema
//!
//! Validation has two parts. The identifying field `permit.number` is checked
//! explicitly so its failures carry stable messages. The rest of the record is
//! checked by deserializing into [`PermitRecord`], which enforces section
//! shapes. Leaves accept any JSON value; coercion belongs to the mapper.

use crate::domain::PermitRecord;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Message for a record whose identifier is absent, `null` or empty
pub const MISSING_PERMIT_ID: &str = "Missing permit_id";

/// Message for a value that is not a JSON object
pub const NOT_AN_OBJECT: &str = "Record is not an object";

/// Validate a mapped record, returning every problem found
///
/// Returns an empty list iff the record is valid.
///
/// # Examples
///
/// ```
/// use permit_etl::core::validation::validate;
/// use serde_json::json;
///
/// assert!(validate(&json!({"permit": {"number": "2023-001"}})).is_empty());
/// assert_eq!(validate(&json!({"permit": {"number": null}})), vec!["Missing permit_id"]);
/// ```
pub fn validate(record: &Value) -> Vec<String> {
    match validate_record(record) {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    }
}

/// Validate a mapped record and produce its typed form
///
/// # Errors
///
/// Returns the non-empty list of validation messages when the record is invalid.
pub fn validate_record(record: &Value) -> Result<PermitRecord, Vec<String>> {
    let Some(object) = record.as_object() else {
        return Err(vec![NOT_AN_OBJECT.to_string()]);
    };

    if let Some(error) = check_permit_id(object) {
        return Err(vec![error]);
    }

    PermitRecord::deserialize(record).map_err(|e| vec![format!("Schema violation: {e}")])
}

fn check_permit_id(object: &Map<String, Value>) -> Option<String> {
    let permit = match object.get("permit") {
        None | Some(Value::Null) => return Some(MISSING_PERMIT_ID.to_string()),
        Some(Value::Object(permit)) => permit,
        Some(other) => {
            return Some(format!(
                "Schema violation: permit: expected object, got {}",
                kind(other)
            ))
        }
    };

    match permit.get("number") {
        None | Some(Value::Null) => Some(MISSING_PERMIT_ID.to_string()),
        Some(Value::String(number)) if number.is_empty() => Some(MISSING_PERMIT_ID.to_string()),
        Some(Value::String(_)) => None,
        Some(other) => Some(format!(
            "Invalid permit_id: expected string, got {}",
            kind(other)
        )),
    }
}

/// JSON type name used in messages
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
