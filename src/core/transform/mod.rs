//! Field mapping from flat source records to the nested permit shape
//!
//! [`map_record`] is total: it never fails, and values that cannot be coerced
//! degrade to `null`. The field table lives in [`mapping::FIELD_MAP`].

pub mod mapping;

use crate::domain::RawRecord;
use mapping::{FieldMapping, Transform, FIELD_MAP};
use serde_json::{Map, Number, Value};

/// Map a flat source record into the nested permit shape
///
/// Every target field is populated by an independent key lookup; a missing key
/// yields `null`. The result is the pre-validation shape carried by anomaly
/// entries.
///
/// # Examples
///
/// ```
/// use permit_etl::core::transform::map_record;
/// use serde_json::json;
///
/// let raw = json!({"permit_number": "2023-001", "latitude": "30.26"});
/// let mapped = map_record(raw.as_object().unwrap());
///
/// assert_eq!(mapped["permit"]["number"], "2023-001");
/// assert_eq!(mapped["coordinates"]["latitude"], 30.26);
/// assert_eq!(mapped["location"]["original"]["state"], "TX");
/// ```
pub fn map_record(raw: &RawRecord) -> Value {
    let mut root = Map::new();
    for mapping in FIELD_MAP {
        insert_at(&mut root, mapping.path, apply(mapping, raw));
    }
    Value::Object(root)
}

fn apply(mapping: &FieldMapping, raw: &RawRecord) -> Value {
    let value = mapping
        .source
        .and_then(|key| raw.get(key))
        .unwrap_or(&Value::Null);

    match mapping.transform {
        Transform::Passthrough => value.clone(),
        Transform::Number => coerce_number(value),
        Transform::Date => truncate_date(value),
        Transform::DefaultText(default) => {
            if is_truthy(value) {
                value.clone()
            } else {
                Value::String(default.to_string())
            }
        }
        Transform::Text => coerce_text(value),
        Transform::Null => Value::Null,
    }
}

/// Set `value` at `path`, creating intermediate objects as needed
fn insert_at(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for key in parents {
        let entry = current
            .entry((*key).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert((*last).to_string(), value);
}

/// Best-effort numeric coercion
///
/// Numbers pass through as floats, strings are trimmed and parsed, booleans
/// become `1.0` / `0.0`. Everything else, and any non-finite result, is `null`.
pub fn coerce_number(value: &Value) -> Value {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    parsed
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Keep the text before the first `T` of a timestamp string
///
/// Non-string values and strings without a `T` pass through unchanged.
pub fn truncate_date(value: &Value) -> Value {
    match value {
        Value::String(s) => match s.split_once('T') {
            Some((date, _)) => Value::String(date.to_string()),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

/// Textual form of a value, `null` when the value is falsy
pub fn coerce_text(value: &Value) -> Value {
    if !is_truthy(value) {
        return Value::Null;
    }
    match value {
        Value::String(_) => value.clone(),
        other => Value::String(other.to_string()),
    }
}

/// Truthiness: `null`, `false`, zero, and empty strings, arrays and objects are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::SECTIONS;
    use fake::faker::address::en::{CityName, StateAbbr, ZipCode};
    use fake::faker::lorem::en::Sentence;
    use fake::{Fake, Faker};
    use serde_json::json;
    use test_case::test_case;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("test record must be an object, got {other}"),
        }
    }

    #[test_case("30.26", Some(30.26) ; "number passes")]
    #[test_case("\"30.26\"", Some(30.26) ; "numeric string")]
    #[test_case("\"  1200 \"", Some(1200.0) ; "padded string")]
    #[test_case("\"-97.74\"", Some(-97.74) ; "negative string")]
    #[test_case("true", Some(1.0) ; "true is one")]
    #[test_case("false", Some(0.0) ; "false is zero")]
    #[test_case("\"\"", None ; "empty string")]
    #[test_case("\"n/a\"", None ; "non numeric text")]
    #[test_case("\"NaN\"", None ; "nan text")]
    #[test_case("\"inf\"", None ; "infinite text")]
    #[test_case("null", None ; "null")]
    #[test_case("[1]", None ; "array")]
    #[test_case("{\"a\":1}", None ; "object")]
    fn test_coerce_number(input: &str, expected: Option<f64>) {
        let value: Value = serde_json::from_str(input).unwrap();
        let expected = expected.map(|f| json!(f)).unwrap_or(Value::Null);
        assert_eq!(coerce_number(&value), expected);
    }

    #[test_case("\"2023-05-01T00:00:00.000\"", "\"2023-05-01\"" ; "timestamp")]
    #[test_case("\"2023-05-01\"", "\"2023-05-01\"" ; "plain date")]
    #[test_case("\"T\"", "\"\"" ; "leading t")]
    #[test_case("null", "null" ; "null passes")]
    #[test_case("20230501", "20230501" ; "number passes")]
    fn test_truncate_date(input: &str, expected: &str) {
        let value: Value = serde_json::from_str(input).unwrap();
        let expected: Value = serde_json::from_str(expected).unwrap();
        assert_eq!(truncate_date(&value), expected);
    }

    #[test_case("\"78701\"", "\"78701\"" ; "string")]
    #[test_case("78701", "\"78701\"" ; "integer")]
    #[test_case("\"\"", "null" ; "empty string")]
    #[test_case("0", "null" ; "zero")]
    #[test_case("false", "null" ; "false")]
    #[test_case("null", "null" ; "null")]
    #[test_case("[]", "null" ; "empty array")]
    fn test_coerce_text(input: &str, expected: &str) {
        let value: Value = serde_json::from_str(input).unwrap();
        let expected: Value = serde_json::from_str(expected).unwrap();
        assert_eq!(coerce_text(&value), expected);
    }

    #[test]
    fn test_minimal_record_maps_with_defaults() {
        let mapped = map_record(&raw(json!({
            "permit_number": "2023-001",
            "latitude": "30.26"
        })));

        assert_eq!(mapped["permit"]["number"], "2023-001");
        assert_eq!(mapped["coordinates"]["latitude"], json!(30.26));
        assert_eq!(mapped["coordinates"]["longitude"], Value::Null);
        assert_eq!(mapped["location"]["original"]["state"], "TX");
        assert_eq!(mapped["location"]["original"]["zip"], Value::Null);
        assert_eq!(mapped["location"]["geo"], Value::Null);
        assert_eq!(mapped["permit"]["type"], Value::Null);
        assert_eq!(mapped["applicant"]["address"]["zip"], Value::Null);
    }

    #[test]
    fn test_missing_permit_number_maps_to_null() {
        let mapped = map_record(&raw(json!({"latitude": "30.26"})));
        assert_eq!(mapped["permit"]["number"], Value::Null);
    }

    #[test]
    fn test_dates_are_truncated() {
        let mapped = map_record(&raw(json!({
            "permit_number": "X",
            "applieddate": "2023-05-01T00:00:00.000",
            "status date": "2023-06-02T12:30:00.000",
            "day_issued": "MONDAY"
        })));

        assert_eq!(mapped["dates"]["applied"], "2023-05-01");
        assert_eq!(mapped["dates"]["status"], "2023-06-02");
        assert_eq!(mapped["dates"]["day_issued"], "MONDAY");
    }

    #[test]
    fn test_keys_with_spaces_are_read() {
        let mapped = map_record(&raw(json!({
            "permit type": "BP",
            "master permit number": "2019-100"
        })));

        assert_eq!(mapped["permit"]["type"], "BP");
        assert_eq!(mapped["permit"]["master_number"], "2019-100");
    }

    #[test]
    fn test_state_keeps_truthy_value() {
        let mapped = map_record(&raw(json!({"original_state": "OK"})));
        assert_eq!(mapped["location"]["original"]["state"], "OK");

        let mapped = map_record(&raw(json!({"original_state": ""})));
        assert_eq!(mapped["location"]["original"]["state"], "TX");
    }

    #[test]
    fn test_empty_record_has_every_section() {
        let mapped = map_record(&RawRecord::new());
        for section in SECTIONS {
            assert!(mapped[section].is_object(), "missing section {section}");
        }
    }

    #[test]
    fn test_random_records_keep_permit_number() {
        for _ in 0..50 {
            let number: String = Faker.fake();
            let record = raw(json!({
                "permit_number": number,
                "original_city": CityName().fake::<String>(),
                "original_state": StateAbbr().fake::<String>(),
                "original_zip": ZipCode().fake::<String>(),
                "description": Sentence(3..8).fake::<String>(),
                "latitude": (29.0..31.0).fake::<f64>().to_string(),
                "housing_units": (0..400).fake::<u32>(),
                "total_job_valuation": Faker.fake::<String>(),
            }));

            let mapped = map_record(&record);
            assert_eq!(mapped["permit"]["number"], record["permit_number"]);
            assert!(mapped["coordinates"]["latitude"].is_f64());
            assert!(mapped["building"]["housing_units"].is_f64());
        }
    }
}
