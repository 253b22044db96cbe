//! Property-based tests for FrozenMap laws.
//!
//! This module verifies the order independence of mapping hashes, the
//! change-detection gate on keyed edits, and the merge laws using
//! proptest.

use std::collections::HashMap;

use floe::{hash_value, FrozenMap, Value};
use indexmap::IndexMap;
use proptest::prelude::*;

fn primitive_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9..1.0e9_f64).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    primitive_strategy().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Entries with unique keys, so reordering them cannot change which value
/// a key holds.
fn unique_entries_strategy() -> impl Strategy<Value = HashMap<String, Value>> {
    prop::collection::hash_map("[a-z]{1,8}", value_strategy(), 0..8)
}

// =============================================================================
// Hashing Laws
// =============================================================================

proptest! {
    /// Order Law: 挿入順が違っても同じエントリなら等しい
    #[test]
    fn prop_insertion_order_does_not_affect_equality(
        entries in unique_entries_strategy()
    ) {
        let forward: IndexMap<String, Value> = entries.clone().into_iter().collect();
        let backward: IndexMap<String, Value> =
            entries.into_iter().collect::<Vec<_>>().into_iter().rev().collect();

        let left = FrozenMap::new(forward);
        let right = FrozenMap::new(backward);
        prop_assert_eq!(left.hash_code(), right.hash_code());
        prop_assert_eq!(left, right);
    }

    /// Representation Law: 生のオブジェクトと凍結マップは同じハッシュを持つ
    #[test]
    fn prop_raw_and_frozen_hash_agree(
        entries in unique_entries_strategy()
    ) {
        let raw: IndexMap<String, Value> = entries.into_iter().collect();
        let raw_hash = hash_value(&Value::Object(raw.clone()));
        let map = FrozenMap::new(raw);
        prop_assert_eq!(raw_hash, map.hash_code());
    }
}

// =============================================================================
// Gate Laws
// =============================================================================

proptest! {
    /// Gate Law: 保存済みの値を同じキーに書いても元のインスタンスを返す
    #[test]
    fn prop_set_same_value_is_elided(
        entries in unique_entries_strategy().prop_filter("need at least one entry", |entries| !entries.is_empty()),
        position in any::<prop::sample::Index>()
    ) {
        let map: FrozenMap = entries.into_iter().collect();
        let key = map.keys().nth(position.index(map.len())).unwrap().to_string();
        let stored = map.get(&key).cloned().unwrap();

        let unchanged = map.set(key, stored);
        prop_assert!(unchanged.ptr_eq(&map));
    }

    /// Gate Law: 存在しないキーの削除は元のインスタンスを返す
    #[test]
    fn prop_remove_absent_is_elided(
        entries in unique_entries_strategy()
    ) {
        let map: FrozenMap = entries.into_iter().collect();
        // Keys are lowercase only, so an uppercase key can never exist.
        prop_assert!(map.remove("MISSING").ptr_eq(&map));
    }

    /// Gate Law: 恒等変換は元のインスタンスを返す
    #[test]
    fn prop_identity_map_is_elided(
        entries in unique_entries_strategy()
    ) {
        let map: FrozenMap = entries.into_iter().collect();
        prop_assert!(map.map(|_, value| value.clone()).ptr_eq(&map));
    }
}

// =============================================================================
// Edit Laws
// =============================================================================

proptest! {
    /// Round-Trip Law: set で書いた値は get で読める (正規化済み)
    #[test]
    fn prop_set_get_round_trip(
        entries in unique_entries_strategy(),
        key in "[a-z]{1,8}",
        value in value_strategy()
    ) {
        let map: FrozenMap = entries.into_iter().collect();
        let updated = map.set(key.clone(), value.clone());
        prop_assert_eq!(updated.get(&key), Some(&value.freeze()));
    }

    /// Removal Law: remove したキーは見つからない
    #[test]
    fn prop_remove_then_get_is_none(
        entries in unique_entries_strategy().prop_filter("need at least one entry", |entries| !entries.is_empty()),
        position in any::<prop::sample::Index>()
    ) {
        let map: FrozenMap = entries.into_iter().collect();
        let key = map.keys().nth(position.index(map.len())).unwrap().to_string();

        let removed = map.remove(&key);
        prop_assert_eq!(removed.get(&key), None);
        prop_assert_eq!(removed.len(), map.len() - 1);
    }

    /// Merge Law: 後のソースが先のソースに勝つ
    #[test]
    fn prop_merge_is_right_biased(
        entries in unique_entries_strategy(),
        key in "[a-z]{1,8}",
        first in primitive_strategy(),
        second in primitive_strategy()
    ) {
        let map: FrozenMap = entries.into_iter().collect();
        let merged = map.merge(&[
            Value::Object([(key.clone(), first)].into_iter().collect()),
            Value::Object([(key.clone(), second.clone())].into_iter().collect()),
        ]);
        prop_assert_eq!(merged.get(&key), Some(&second.freeze()));
    }

    /// Freeze-Thaw Law: thaw は freeze を打ち消す
    #[test]
    fn prop_freeze_thaw_round_trip(
        entries in unique_entries_strategy()
    ) {
        let raw: IndexMap<String, Value> = entries.into_iter().collect();
        let frozen_then_thawed = Value::Object(raw.clone()).freeze().thaw();
        prop_assert_eq!(frozen_then_thawed, Value::Object(raw).thaw());
    }

    /// Partition Law: filter(p) と filter(!p) の長さの和は元の長さ
    #[test]
    fn prop_filter_partitions_length(
        entries in unique_entries_strategy()
    ) {
        let map: FrozenMap = entries.into_iter().collect();
        let nulls = map.filter(|_, value| value.is_null());
        let rest = map.filter(|_, value| !value.is_null());
        prop_assert_eq!(nulls.len() + rest.len(), map.len());
    }
}
