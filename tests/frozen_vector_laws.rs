//! Property-based tests for FrozenVector laws.
//!
//! This module verifies the change-detection gate, the representation
//! blindness of content hashing, and the structural laws of the vector
//! operations using proptest.

use floe::{hash_value, FrozenVector, Path, PathKey, Value};
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

// =============================================================================
// Gate Laws
// =============================================================================

proptest! {
    /// Gate Law: 恒等変換は元のインスタンスを返す
    #[test]
    fn prop_identity_map_is_elided(
        slots in prop::collection::vec(value_strategy(), 0..12)
    ) {
        let vector = FrozenVector::new(slots);
        let identity = vector.map(|slot| slot.clone());
        prop_assert!(identity.ptr_eq(&vector));
    }

    /// Gate Law: 保存済みの値を同じ位置に書いても元のインスタンスを返す
    #[test]
    fn prop_set_same_slot_is_elided(
        slots in prop::collection::vec(value_strategy(), 1..12),
        position in any::<prop::sample::Index>()
    ) {
        let vector = FrozenVector::new(slots);
        let index = position.index(vector.len());
        let stored = vector.get(index).cloned().unwrap();

        let unchanged = vector.set(index, stored).unwrap();
        prop_assert!(unchanged.ptr_eq(&vector));
    }

    /// Gate Law: すべて残すフィルタは元のインスタンスを返す
    #[test]
    fn prop_filter_keeping_all_is_elided(
        slots in prop::collection::vec(value_strategy(), 0..12)
    ) {
        let vector = FrozenVector::new(slots);
        prop_assert!(vector.filter(|_| true).ptr_eq(&vector));
    }

    /// Gate Law: ソート済みの内容を再ソートしても元のインスタンスを返す
    #[test]
    fn prop_sort_second_pass_is_elided(
        slots in prop::collection::vec(value_strategy(), 0..12)
    ) {
        let vector = FrozenVector::new(slots);
        let sorted = vector.sort();
        prop_assert!(sorted.sort().ptr_eq(&sorted));
    }
}

// =============================================================================
// Hashing Laws
// =============================================================================

proptest! {
    /// Representation Law: 生の配列と凍結ベクターは同じハッシュを持つ
    #[test]
    fn prop_raw_and_frozen_hash_agree(
        slots in prop::collection::vec(value_strategy(), 0..12)
    ) {
        let raw_hash = hash_value(&Value::Array(slots.clone()));
        let vector = FrozenVector::new(slots);
        prop_assert_eq!(raw_hash, vector.hash_code());
    }

    /// Hash-Equality Law: 同じ内容から作ったベクターは等しくハッシュも一致する
    #[test]
    fn prop_equal_content_gives_equal_vectors(
        slots in prop::collection::vec(value_strategy(), 0..12)
    ) {
        let left = FrozenVector::new(slots.clone());
        let right = FrozenVector::new(slots);
        prop_assert_eq!(left.hash_code(), right.hash_code());
        prop_assert_eq!(left, right);
    }
}

// =============================================================================
// Structural Laws
// =============================================================================

proptest! {
    /// Freeze-Thaw Law: thaw は freeze を打ち消す
    #[test]
    fn prop_freeze_thaw_round_trip(
        slots in prop::collection::vec(value_strategy(), 0..12)
    ) {
        let frozen_then_thawed = Value::Array(slots.clone()).freeze().thaw();
        prop_assert_eq!(frozen_then_thawed, Value::Array(slots).thaw());
    }

    /// Length Law: push は長さを 1 増やす
    #[test]
    fn prop_push_extends_length(
        slots in prop::collection::vec(value_strategy(), 0..12),
        extra in primitive_strategy()
    ) {
        let vector = FrozenVector::new(slots);
        let pushed = vector.push(extra);
        prop_assert_eq!(pushed.len(), vector.len() + 1);
    }

    /// Locality Law: set は指定位置以外に影響しない
    #[test]
    fn prop_set_changes_only_that_slot(
        slots in prop::collection::vec(primitive_strategy(), 1..12),
        position in any::<prop::sample::Index>(),
        replacement in primitive_strategy()
    ) {
        let vector = FrozenVector::new(slots);
        let index = position.index(vector.len());
        let updated = vector.set(index, replacement).unwrap();

        for other in (0..vector.len()).filter(|other| *other != index) {
            prop_assert_eq!(updated.get(other), vector.get(other));
        }
    }

    /// Window Law: slice は範囲を境界に丸める
    #[test]
    fn prop_slice_respects_clamped_window(
        slots in prop::collection::vec(value_strategy(), 0..12),
        start in 0_usize..16,
        end in 0_usize..16
    ) {
        let vector = FrozenVector::new(slots);
        let window = vector.slice(start, end);

        let clamped_start = start.min(vector.len());
        let clamped_end = end.min(vector.len()).max(clamped_start);
        prop_assert_eq!(window.len(), clamped_end - clamped_start);
    }

    /// Partition Law: filter(p) と filter(!p) の長さの和は元の長さ
    #[test]
    fn prop_filter_partitions_length(
        slots in prop::collection::vec(value_strategy(), 0..12)
    ) {
        let vector = FrozenVector::new(slots);
        let nulls = vector.filter(|slot| slot.is_null());
        let rest = vector.filter(|slot| !slot.is_null());
        prop_assert_eq!(nulls.len() + rest.len(), vector.len());
    }

    /// Append Law: プリミティブの連結は長さが加算される
    #[test]
    fn prop_concat_of_primitives_adds_length(
        slots in prop::collection::vec(value_strategy(), 0..8),
        extras in prop::collection::vec(primitive_strategy(), 0..8)
    ) {
        let vector = FrozenVector::new(slots);
        let combined = vector.concat(extras.clone());
        prop_assert_eq!(combined.len(), vector.len() + extras.len());
        prop_assert!(!combined.ptr_eq(&vector));
    }
}

// =============================================================================
// Deep-Path Laws
// =============================================================================

proptest! {
    /// Round-Trip Law: set_in で書いた値は get_in で読める (正規化済み)
    #[test]
    fn prop_set_in_get_in_round_trip(
        slots in prop::collection::vec(primitive_strategy(), 1..8),
        position in any::<prop::sample::Index>(),
        replacement in value_strategy()
    ) {
        let vector = FrozenVector::new(slots);
        let index = position.index(vector.len());
        let route: Path = [PathKey::Index(index)].into_iter().collect();

        let updated = vector.set_in(&route, replacement.clone());
        prop_assert_eq!(updated.get_in(&route), Some(&replacement.freeze()));
    }
}
