//! `JsonValue` plus conversions to and from `serde_json`.
//!
//! Lookups never fail: a missing key, an out-of-range index or a type mismatch yields a
//! shared `error_value` node, so chained lookups can be written without intermediate checks.
use indexmap::IndexMap;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/json_value.rs"));
}

pub use generated::document::{JsonValue, JsonValueKind};

static ERROR_VALUE: JsonValue = JsonValue::ErrorValue;

/// Parses JSON text. Malformed input becomes `error_value`.
pub fn parse(src: &str) -> JsonValue {
    match serde_json::from_str::<serde_json::Value>(src) {
        Ok(value) => JsonValue::from(value),
        Err(_) => JsonValue::error_value(),
    }
}

impl JsonValue {
    pub fn member(&self, key: &str) -> &JsonValue {
        self.as_object_value()
            .and_then(|members| members.get(key))
            .unwrap_or(&ERROR_VALUE)
    }

    pub fn at(&self, index: usize) -> &JsonValue {
        self.as_array_value()
            .and_then(|items| items.get(index))
            .unwrap_or(&ERROR_VALUE)
    }

    /// `None` for the empty and error states, and for non-finite numbers.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        use serde_json::Value;
        Some(match self {
            JsonValue::EmptyValue | JsonValue::ErrorValue => return None,
            JsonValue::NullValue => Value::Null,
            JsonValue::BoolValue(b) => Value::Bool(*b),
            JsonValue::NumberValue(n) => Value::Number(serde_json::Number::from_f64(*n)?),
            JsonValue::StringValue(s) => Value::String(s.clone()),
            JsonValue::ArrayValue(items) => Value::Array(
                items.iter().map(JsonValue::to_json).collect::<Option<Vec<_>>>()?,
            ),
            JsonValue::ObjectValue(members) => {
                let mut map = serde_json::Map::with_capacity(members.len());
                for (k, v) in members {
                    map.insert(k.clone(), v.to_json()?);
                }
                Value::Object(map)
            }
        })
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => JsonValue::null_value(),
            Value::Bool(b) => JsonValue::bool_value(b),
            Value::Number(n) => n.as_f64().map_or_else(JsonValue::error_value, JsonValue::number_value),
            Value::String(s) => JsonValue::string_value(s),
            Value::Array(items) => JsonValue::array_value(items.into_iter().map(JsonValue::from).collect()),
            Value::Object(members) => JsonValue::object_value(
                members
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect::<IndexMap<_, _>>(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_lookups_fall_back_to_error_value() {
        let doc = parse(r#"{"a": [1, {"b": "x"}]}"#);
        assert_eq!(doc.member("a").at(1).member("b").as_string_value().map(String::as_str), Some("x"));
        assert!(doc.member("missing").at(3).member("b").is_error_value());
        assert!(doc.at(0).is_error_value());
    }

    #[test]
    fn malformed_input_is_error_value() {
        assert_eq!(parse("{").kind(), JsonValueKind::ErrorValue);
    }

    #[test]
    fn object_member_order_is_preserved() {
        let doc = parse(r#"{"z": 1, "a": 2, "m": 3}"#);
        let keys: Vec<&str> = doc.as_object_value().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn to_json_rejects_states_without_json_form() {
        assert_eq!(JsonValue::empty_value().to_json(), None);
        assert_eq!(JsonValue::array_value(vec![JsonValue::error_value()]).to_json(), None);
        assert_eq!(JsonValue::number_value(f64::NAN).to_json(), None);
        let src = serde_json::json!({"k": [true, null, 1.5, "s"]});
        assert_eq!(JsonValue::from(src.clone()).to_json(), Some(src));
    }
}
