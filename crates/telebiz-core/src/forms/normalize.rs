//! Collapsing runtime field values into submit-ready primitives.
//!
//! Form widgets hand back whatever shape they hold: option objects, arrays
//! of option objects, comma-separated strings. Before a value crosses the
//! API boundary it becomes a primitive or a sequence of primitives.

use serde_json::Value;
use telebiz_models::{FieldType, FieldValue};

/// Attributes tried, in order, when unwrapping an object to its identifier.
const IDENTIFYING_KEYS: [&str; 5] = ["value", "id", "key", "name", "label"];

/// Normalizes `raw` for a field of `field_type`.
///
/// - `multiselect`: always a JSON array. Arrays are unwrapped element-wise,
///   strings are split on commas, single objects become one element.
/// - `select`: one primitive, or `None`.
/// - anything else: passed through unchanged.
///
/// Empty input (`null`, `false`, `0`, `""`, `[]`) gives `None`, except for
/// multiselect which gives an empty array.
pub fn normalize_value(field_type: FieldType, raw: &Value) -> Option<Value> {
    if is_empty(raw) {
        return match field_type {
            FieldType::Multiselect => Some(Value::Array(Vec::new())),
            _ => None,
        };
    }

    match field_type {
        FieldType::Multiselect => Some(Value::Array(collect_list(raw))),
        FieldType::Select => collapse_single(raw),
        _ => Some(raw.clone()),
    }
}

/// Normalizes `raw` and converts it into a [`FieldValue`].
pub fn to_field_value(field_type: FieldType, raw: &Value) -> FieldValue {
    match normalize_value(field_type, raw) {
        Some(Value::Array(items)) => {
            FieldValue::List(items.iter().map(primitive_to_string).collect())
        }
        Some(other) => FieldValue::Text(primitive_to_string(&other)),
        None => FieldValue::empty_for(field_type),
    }
}

/// JSON form of a stored [`FieldValue`].
pub fn field_value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
    }
}

fn is_empty(raw: &Value) -> bool {
    match raw {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn collect_list(raw: &Value) -> Vec<Value> {
    match raw {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| Value::String(segment.to_string()))
            .collect(),
        Value::Array(items) => items.iter().flat_map(collect_element).collect(),
        other => unwrap_identifier(other).into_iter().collect(),
    }
}

/// Elements of an incoming array; nested arrays are flattened.
fn collect_element(item: &Value) -> Vec<Value> {
    match item {
        Value::Array(inner) => inner.iter().flat_map(collect_element).collect(),
        other => unwrap_identifier(other).into_iter().collect(),
    }
}

fn collapse_single(raw: &Value) -> Option<Value> {
    match raw {
        Value::Array(items) => items.iter().find_map(collapse_single),
        other => unwrap_identifier(other),
    }
}

/// Most specific identifying primitive of `value`.
fn unwrap_identifier(value: &Value) -> Option<Value> {
    match value {
        Value::Object(map) => IDENTIFYING_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find(|v| !is_empty(v))
            .and_then(unwrap_identifier),
        Value::Array(items) => items.iter().find_map(unwrap_identifier),
        v if is_empty(v) => None,
        v => Some(v.clone()),
    }
}

fn primitive_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multiselect_plain_strings_idempotent() {
        let once = normalize_value(FieldType::Multiselect, &json!(["a", "b"])).unwrap();
        assert_eq!(once, json!(["a", "b"]));
        let twice = normalize_value(FieldType::Multiselect, &once).unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_multiselect_unwraps_objects() {
        let raw = json!([
            {"value": "v1", "label": "One"},
            {"id": 2, "name": "Two"},
            {"key": "k3"},
            {"name": "n4"},
            {"label": "l5"},
        ]);
        assert_eq!(
            normalize_value(FieldType::Multiselect, &raw).unwrap(),
            json!(["v1", 2, "k3", "n4", "l5"])
        );
    }

    #[test]
    fn test_multiselect_nested_identifier() {
        let raw = json!([{"value": {"id": "inner"}}]);
        assert_eq!(
            normalize_value(FieldType::Multiselect, &raw).unwrap(),
            json!(["inner"])
        );
    }

    #[test]
    fn test_multiselect_comma_string() {
        assert_eq!(
            normalize_value(FieldType::Multiselect, &json!(" red, green ,,blue ")).unwrap(),
            json!(["red", "green", "blue"])
        );
    }

    #[test]
    fn test_multiselect_single_object() {
        assert_eq!(
            normalize_value(FieldType::Multiselect, &json!({"id": 7})).unwrap(),
            json!([7])
        );
    }

    #[test]
    fn test_multiselect_empty_is_empty_array() {
        for raw in [json!(null), json!(""), json!([]), json!(false), json!(0)] {
            assert_eq!(normalize_value(FieldType::Multiselect, &raw), Some(json!([])));
        }
    }

    #[test]
    fn test_select_collapses_to_first() {
        assert_eq!(
            normalize_value(FieldType::Select, &json!([{"value": "a"}, {"value": "b"}])),
            Some(json!("a"))
        );
        assert_eq!(
            normalize_value(FieldType::Select, &json!({"label": "Only", "id": 12})),
            Some(json!(12))
        );
        assert_eq!(normalize_value(FieldType::Select, &json!("won")), Some(json!("won")));
    }

    #[test]
    fn test_select_does_not_split_commas() {
        assert_eq!(
            normalize_value(FieldType::Select, &json!("a,b")),
            Some(json!("a,b"))
        );
    }

    #[test]
    fn test_select_empty_is_none() {
        assert_eq!(normalize_value(FieldType::Select, &json!(null)), None);
        assert_eq!(normalize_value(FieldType::Select, &json!("")), None);
        assert_eq!(normalize_value(FieldType::Select, &json!([{}])), None);
        assert_eq!(normalize_value(FieldType::Select, &json!(0)), None);
        assert_eq!(normalize_value(FieldType::Select, &json!(0.0)), None);
    }

    #[test]
    fn test_zero_identifier_falls_through_to_next_key() {
        assert_eq!(
            normalize_value(FieldType::Select, &json!({"id": 0, "name": "Unassigned"})),
            Some(json!("Unassigned"))
        );
        assert_eq!(normalize_value(FieldType::Select, &json!("0")), Some(json!("0")));
    }

    #[test]
    fn test_other_types_pass_through() {
        assert_eq!(
            normalize_value(FieldType::Text, &json!({"value": "x"})),
            Some(json!({"value": "x"}))
        );
        assert_eq!(normalize_value(FieldType::Number, &json!(7)), Some(json!(7)));
        assert_eq!(normalize_value(FieldType::Number, &json!(0)), None);
        assert_eq!(normalize_value(FieldType::Text, &json!("")), None);
    }

    #[test]
    fn test_to_field_value() {
        assert_eq!(
            to_field_value(FieldType::Multiselect, &json!([{"id": 1}, "b"])),
            FieldValue::List(vec!["1".into(), "b".into()])
        );
        assert_eq!(
            to_field_value(FieldType::Select, &json!({"name": "Done"})),
            FieldValue::text("Done")
        );
        assert_eq!(to_field_value(FieldType::Number, &json!(12.5)), FieldValue::text("12.5"));
        assert_eq!(to_field_value(FieldType::Select, &json!(null)), FieldValue::text(""));
    }
}
