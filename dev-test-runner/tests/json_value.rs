use dev_test_runner::json::{self, JsonValue, JsonValueKind};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

#[test]
#[allow(clippy::approx_constant)]
fn number_then_null() {
    let mut v = JsonValue::number_value(3.14);
    assert_eq!(v.kind(), JsonValueKind::NumberValue);
    assert!(!v.is_bool_value());
    assert!(!v.get_bool_value_or(false));
    assert_eq!(v.get_number_value_or(0.0), 3.14);

    v.assign(&mut JsonValue::null_value());
    assert_eq!(v.kind(), JsonValueKind::NullValue);
    assert_eq!(v.as_number_value(), None);
}

#[test]
fn try_get_leaves_output_alone_on_mismatch() {
    let v = JsonValue::string_value("hello".to_string());
    let mut flag = true;
    let mut number = 1.5;
    assert!(!v.get_bool_value(&mut flag));
    assert!(!v.get_number_value(&mut number));
    assert!(flag);
    assert_eq!(number, 1.5);

    let mut text = String::from("previous");
    assert!(v.get_string_value(&mut text));
    assert_eq!(text, "hello");
}

#[test]
fn defaults_by_reference_and_by_value() {
    let v = JsonValue::string_value("s".to_string());
    let fallback = String::from("fallback");
    assert_eq!(v.string_value_or(&fallback), "s");

    let empty: Vec<JsonValue> = Vec::new();
    assert!(v.array_value_or(&empty).is_empty());
    assert_eq!(v.get_array_value_or(vec![JsonValue::null_value()]).len(), 1);
    assert_eq!(v.kind(), JsonValueKind::StringValue);
}

#[test]
fn recursive_payloads_clone_deeply() {
    let mut members = IndexMap::new();
    members.insert("list".to_string(), JsonValue::from(vec![JsonValue::from(1.0_f64), JsonValue::from(true)]));
    let original = JsonValue::from(members);

    let mut copy = original.clone();
    copy.visit_object_value_mut(|m| {
        m.insert("extra".to_string(), JsonValue::null_value());
    });

    assert_eq!(original.as_object_value().map(IndexMap::len), Some(1));
    assert_eq!(copy.as_object_value().map(IndexMap::len), Some(2));
    assert!(original.member("list").at(1).is_bool_value());
}

#[test]
fn set_replaces_across_kinds() {
    let mut v = JsonValue::default();
    v.set_array_value(vec![JsonValue::from("a".to_string())]);
    assert_eq!(v.kind(), JsonValueKind::ArrayValue);
    v.set_string_value_cloned(&"b".to_string());
    assert_eq!(v.as_string_value().map(String::as_str), Some("b"));
    v.set_error_value();
    assert!(v.is_error_value());
    v.clear();
    assert!(v.is_empty_value());
}

#[test]
fn parsed_documents_map_onto_slots() {
    let doc = json::parse(r#"{"name": "x", "tags": ["a", "b"], "ok": true, "n": null}"#);
    let kinds: Vec<JsonValueKind> = ["name", "tags", "ok", "n", "nope"]
        .iter()
        .map(|k| doc.member(k).kind())
        .collect();
    assert_eq!(kinds, [
        JsonValueKind::StringValue,
        JsonValueKind::ArrayValue,
        JsonValueKind::BoolValue,
        JsonValueKind::NullValue,
        JsonValueKind::ErrorValue,
    ]);
    assert_eq!(doc.kind().name(), "object_value");
}

#[test]
fn members_extend_the_container() {
    let doc = json::parse(r#"{"a": 1, "b": [true], "c": null}"#);
    assert!(doc.is_container());
    assert!(doc.member("a").is_scalar());
    assert!(doc.member("b").is_container() && !doc.member("b").is_scalar());
    assert!(!doc.member("c").is_scalar() && !doc.member("c").is_container());
    assert!(!JsonValue::default().is_scalar());
}
