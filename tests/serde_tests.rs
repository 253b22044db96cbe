#![cfg(feature = "serde")]

//! Serde integration tests.
//!
//! This module verifies that values and frozen collections cross the
//! serde boundary with their content intact: frozen collections
//! serialize as plain sequences and mappings, and deserialization
//! freezes collection payloads on the way in.

use floe::{frozen_map, frozen_vector, FrozenMap, FrozenVector, Value};
use rstest::rstest;

// =============================================================================
// Serialization
// =============================================================================

#[rstest]
fn test_primitives_serialize_to_plain_json() {
    assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
    assert_eq!(serde_json::to_string(&Value::from(true)).unwrap(), "true");
    assert_eq!(serde_json::to_string(&Value::from(3)).unwrap(), "3");
    assert_eq!(serde_json::to_string(&Value::from("text")).unwrap(), "\"text\"");
}

#[rstest]
fn test_frozen_vector_serializes_as_a_sequence() {
    let vector = frozen_vector![1, "two", Value::Null];
    assert_eq!(serde_json::to_string(&vector).unwrap(), "[1,\"two\",null]");
}

#[rstest]
fn test_frozen_map_serializes_in_insertion_order() {
    let map = frozen_map! { "volume" => 10, "mode" => "dark" };
    assert_eq!(
        serde_json::to_string(&map).unwrap(),
        "{\"volume\":10,\"mode\":\"dark\"}",
    );
}

#[rstest]
fn test_raw_and_frozen_forms_serialize_identically() {
    let raw = Value::Array(vec![Value::from(1), Value::from(2)]);
    let frozen = raw.clone().freeze();
    assert_eq!(
        serde_json::to_string(&raw).unwrap(),
        serde_json::to_string(&frozen).unwrap(),
    );
}

#[rstest]
fn test_nested_collections_flatten_to_plain_json() {
    let map = frozen_map! {
        "items" => frozen_vector![1, frozen_map! { "deep" => true }],
    };
    assert_eq!(
        serde_json::to_string(&map).unwrap(),
        "{\"items\":[1,{\"deep\":true}]}",
    );
}

// =============================================================================
// Deserialization
// =============================================================================

#[rstest]
fn test_value_deserializes_to_raw_forms() {
    let value: Value = serde_json::from_str("{\"items\":[1,2]}").unwrap();
    let Value::Object(entries) = &value else {
        panic!("expected a raw mapping");
    };
    assert!(matches!(entries.get("items"), Some(Value::Array(_))));
}

#[rstest]
fn test_frozen_vector_deserializes_frozen_all_the_way_down() {
    let vector: FrozenVector = serde_json::from_str("[1,[2,3],{\"k\":4}]").unwrap();
    assert_eq!(vector.len(), 3);
    assert!(matches!(vector.get(1), Some(Value::Vector(_))));
    assert!(matches!(vector.get(2), Some(Value::Map(_))));
}

#[rstest]
fn test_frozen_map_deserializes_keeping_document_order() {
    let map: FrozenMap = serde_json::from_str("{\"b\":1,\"a\":2}").unwrap();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
}

#[rstest]
fn test_integers_past_i64_fall_back_to_float() {
    let value: Value = serde_json::from_str("18446744073709551615").unwrap();
    assert!(matches!(value, Value::Float(_)));

    let in_range: Value = serde_json::from_str("9223372036854775807").unwrap();
    assert_eq!(in_range, Value::Int(i64::MAX));
}

// =============================================================================
// Round trips
// =============================================================================

#[rstest]
fn test_vector_round_trip_preserves_content() {
    let vector = frozen_vector![1, "two", frozen_vector![3.5]];
    let text = serde_json::to_string(&vector).unwrap();
    let back: FrozenVector = serde_json::from_str(&text).unwrap();
    assert_eq!(back, vector);
}

#[rstest]
fn test_map_round_trip_preserves_content_and_order() {
    let map = frozen_map! { "volume" => 10, "mode" => "dark" };
    let text = serde_json::to_string(&map).unwrap();
    let back: FrozenMap = serde_json::from_str(&text).unwrap();
    assert_eq!(back, map);
    assert_eq!(
        back.keys().collect::<Vec<_>>(),
        map.keys().collect::<Vec<_>>(),
    );
}

#[rstest]
fn test_value_round_trip_through_thaw() {
    let original = Value::Map(frozen_map! {
        "items" => frozen_vector![1, 2],
        "name" => "floe",
    });
    let text = serde_json::to_string(&original).unwrap();
    let reparsed: Value = serde_json::from_str(&text).unwrap();

    // Deserialization lands on raw forms; freezing restores the original.
    assert_eq!(reparsed.clone().freeze(), original);
    assert_eq!(reparsed, original.thaw());
}
