//! Frozen (immutable) string-keyed map of dynamic values.
//!
//! This module provides [`FrozenMap`], an immutable insertion-ordered
//! mapping from string keys to [`Value`]s, the keyed counterpart of
//! [`FrozenVector`](crate::FrozenVector).
//!
//! # Overview
//!
//! A `FrozenMap` freezes its entry values recursively at construction and
//! stamps the raw input with a content fingerprint. Mapping fingerprints are
//! insertion-order independent: two maps holding the same entries are equal
//! even when their keys enumerate in different orders. Iteration order is
//! still the insertion order, so reordering is observable through
//! enumeration while remaining invisible to equality.
//!
//! Every "mutating" operation routes its candidate through the same hash
//! gate as the vector: a candidate that changes nothing is discarded and
//! the original instance is returned (observable through
//! [`FrozenMap::ptr_eq`]).
//!
//! # Examples
//!
//! ```rust
//! use floe::{FrozenMap, Value};
//!
//! let settings: FrozenMap = [("volume", Value::from(10))].into_iter().collect();
//!
//! let louder = settings.set("volume", Value::from(60));
//! assert_eq!(louder.get("volume"), Some(&Value::from(60)));
//! assert_eq!(settings.get("volume"), Some(&Value::from(10))); // original unchanged
//!
//! // Removing a key that was never there changes nothing.
//! let same = settings.remove("missing");
//! assert!(same.ptr_eq(&settings));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use indexmap::IndexMap;

use super::ReferenceCounter;

use crate::hash::{hash_mapping, hash_value, HashCode};
use crate::path::{assign_at_path, merge_at_path, merge_into, resolve_path, PathKey};
use crate::value::{display_mapping, Value};

// =============================================================================
// FrozenMap Definition
// =============================================================================

/// A frozen (immutable) string-keyed mapping of [`Value`]s.
///
/// Entries keep their insertion order for enumeration; equality and the
/// no-op gate use an order-independent content fingerprint.
///
/// # Examples
///
/// ```rust
/// use floe::{FrozenMap, Value};
///
/// let map: FrozenMap = [
///     ("name", Value::from("floe")),
///     ("stars", Value::from(3)),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get("name"), Some(&Value::from("floe")));
/// ```
#[derive(Clone)]
pub struct FrozenMap {
    /// Order-independent content fingerprint computed from the raw input.
    hash_code: HashCode,
    /// Normalized entries: values are primitives or frozen collections.
    slots: ReferenceCounter<IndexMap<String, Value>>,
}

impl FrozenMap {
    /// Freezes a raw string-keyed mapping.
    ///
    /// The raw input is fingerprinted first, then every entry value is
    /// normalized recursively. Keys are ordinary data; no name is
    /// reserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenMap, Value};
    ///
    /// let map = FrozenMap::new(
    ///     [("nested".to_string(), Value::Array(vec![Value::from(1)]))]
    ///         .into_iter()
    ///         .collect(),
    /// );
    /// assert!(matches!(map.get("nested"), Some(Value::Vector(_))));
    /// ```
    #[must_use]
    pub fn new(slots: IndexMap<String, Value>) -> Self {
        let hash_code = hash_mapping(&slots);
        Self::with_hash(hash_code, slots)
    }

    /// Builds a map from raw entries and their precomputed fingerprint.
    fn with_hash(hash_code: HashCode, slots: IndexMap<String, Value>) -> Self {
        Self {
            hash_code,
            slots: ReferenceCounter::new(
                slots
                    .into_iter()
                    .map(|(key, value)| (key, value.freeze()))
                    .collect(),
            ),
        }
    }

    /// Routes a raw candidate through the change-detection gate.
    fn gate(&self, candidate: IndexMap<String, Value>) -> Self {
        let hash_code = hash_mapping(&candidate);
        if hash_code == self.hash_code {
            self.clone()
        } else {
            Self::with_hash(hash_code, candidate)
        }
    }

    /// Gates an arbitrary candidate value produced by a bulk edit.
    fn gate_value(&self, candidate: Value) -> Value {
        if hash_value(&candidate) == self.hash_code {
            Value::Map(self.clone())
        } else {
            candidate.freeze()
        }
    }

    /// Gates the root produced by a deep write.
    ///
    /// Deep writes leave the root a raw mapping unless an empty path
    /// replaced it wholesale; a root that is no longer a mapping cannot
    /// become `Self`, so such a replacement is refused.
    fn regate_root(&self, root: Value) -> Self {
        match root {
            Value::Object(slots) => self.gate(slots),
            Value::Map(map) => {
                if map.hash_code == self.hash_code {
                    self.clone()
                } else {
                    map
                }
            }
            _ => self.clone(),
        }
    }

    /// Returns the content fingerprint stamped at construction.
    #[inline]
    #[must_use]
    pub const fn hash_code(&self) -> HashCode {
        self.hash_code
    }

    /// Returns `true` when both handles share the same backing storage.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.slots, &other.slots)
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns a reference to the value stored under `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.slots.get(key)
    }

    /// Returns `true` if an entry with `key` exists.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Returns an iterator over the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.slots.keys().map(String::as_str)
    }

    /// Returns an iterator over the values in insertion order.
    #[must_use]
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &Value> + ExactSizeIterator {
        self.slots.values()
    }

    /// Returns an iterator over `(key, value)` pairs; an alias for
    /// [`iter`].
    ///
    /// [`iter`]: FrozenMap::iter
    #[must_use]
    pub fn entries(&self) -> FrozenMapIterator<'_> {
        self.iter()
    }

    /// Returns a fresh iterator over `(key, value)` pairs in insertion
    /// order.
    #[must_use]
    pub fn iter(&self) -> FrozenMapIterator<'_> {
        FrozenMapIterator {
            entries: self.slots.iter(),
        }
    }

    /// Compares this map with any value by content fingerprint.
    ///
    /// Only frozen collections can compare equal; raw aggregates and
    /// primitives never are.
    #[must_use]
    pub fn equals(&self, other: &Value) -> bool {
        match other {
            Value::Map(map) => map.hash_code == self.hash_code,
            Value::Vector(vector) => vector.hash_code() == self.hash_code,
            _ => false,
        }
    }
}

// =============================================================================
// Structural Operations
// =============================================================================

impl FrozenMap {
    /// Stores `value` under `key` and gates the result.
    ///
    /// An existing key keeps its position in the enumeration order; a new
    /// key appends. Writing a value equal to the one already stored
    /// returns this map itself. Infallible: string keys have no range to
    /// exceed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenMap, Value};
    ///
    /// let map: FrozenMap = [("volume", Value::from(10))].into_iter().collect();
    ///
    /// let louder = map.set("volume", Value::from(60));
    /// assert_eq!(louder.get("volume"), Some(&Value::from(60)));
    ///
    /// let unchanged = map.set("volume", Value::from(10));
    /// assert!(unchanged.ptr_eq(&map));
    /// ```
    #[must_use]
    pub fn set(&self, key: impl Into<String>, value: Value) -> Self {
        let mut candidate = self.to_index_map();
        candidate.insert(key.into(), value);
        self.gate(candidate)
    }

    /// Removes the entry under `key`, keeping the order of the remaining
    /// entries, and gates the result.
    ///
    /// Removing an absent key changes nothing and returns this map
    /// itself.
    #[must_use]
    pub fn remove(&self, key: &str) -> Self {
        let mut candidate = self.to_index_map();
        candidate.shift_remove(key);
        self.gate(candidate)
    }

    /// Shallow-merges `sources` into this map and gates the result.
    ///
    /// Later sources override earlier ones on key collision, and existing
    /// keys keep their enumeration position. Sequence sources contribute
    /// their positions as decimal keys; sources that are not aggregates
    /// are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{frozen_map, FrozenMap, Value};
    ///
    /// let base = frozen_map! { "a" => 1, "b" => 2 };
    /// let merged = base.merge(&[
    ///     Value::Map(frozen_map! { "b" => 9, "c" => 3 }),
    ///     Value::from("skipped"),
    /// ]);
    ///
    /// assert_eq!(merged.get("b"), Some(&Value::from(9)));
    /// assert_eq!(merged.get("c"), Some(&Value::from(3)));
    ///
    /// // Merging entries the map already holds changes nothing.
    /// let same = base.merge(&[Value::Map(frozen_map! { "a" => 1 })]);
    /// assert!(same.ptr_eq(&base));
    /// ```
    #[must_use]
    pub fn merge(&self, sources: &[Value]) -> Self {
        let mut root = Value::Object(self.to_index_map());
        merge_into(&mut root, sources);
        self.regate_root(root)
    }

    /// Maps every entry value through `transform` and gates the result.
    ///
    /// Keys and their order are preserved; a transform that reproduces
    /// every value unchanged returns this map itself.
    #[must_use]
    pub fn map<F>(&self, mut transform: F) -> Self
    where
        F: FnMut(&str, &Value) -> Value,
    {
        let mut candidate = IndexMap::with_capacity(self.len());
        for (key, value) in self.iter() {
            let transformed = transform(key, value);
            candidate.insert(key.clone(), transformed);
        }
        self.gate(candidate)
    }

    /// Keeps the entries the predicate accepts and gates the result.
    ///
    /// A predicate that keeps every entry returns this map itself.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&str, &Value) -> bool,
    {
        let mut candidate = IndexMap::with_capacity(self.len());
        for (key, value) in self.iter() {
            if predicate(key, value) {
                candidate.insert(key.clone(), value.clone());
            }
        }
        self.gate(candidate)
    }
}

// =============================================================================
// Path Operations
// =============================================================================

impl FrozenMap {
    /// Returns the slot addressed by `path`, walking through nested
    /// collections of either kind.
    ///
    /// An index as the first key falls back to its decimal rendering, the
    /// same fallback the write engine applies. The empty path resolves to
    /// `None` (the map itself is not a slot).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{frozen_map, PathKey, Value};
    ///
    /// let map = frozen_map! {
    ///     "emails" => vec![Value::from("a@example.com")],
    /// };
    /// let path = [PathKey::from("emails"), PathKey::from(0_usize)];
    /// assert_eq!(map.get_in(&path), Some(&Value::from("a@example.com")));
    /// ```
    #[must_use]
    pub fn get_in(&self, path: &[PathKey]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let slot = match first {
            PathKey::Key(key) => self.get(key)?,
            PathKey::Index(index) => self.get(&index.to_string())?,
        };
        resolve_path(slot, rest)
    }

    /// Writes `value` at `path`, vivifying missing intermediates, and
    /// gates the rewritten root.
    ///
    /// Missing intermediates vivify as empty mappings; an index key on
    /// the way writes its decimal rendering. Only the spine along the
    /// path is rewritten. A write that changes nothing returns this map
    /// itself; an empty path with a non-mapping value is refused.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenMap, PathKey, Value};
    ///
    /// let map = FrozenMap::default();
    /// let path = [PathKey::from("profile"), PathKey::from("name")];
    ///
    /// let updated = map.set_in(&path, Value::from("floe"));
    /// assert_eq!(updated.get_in(&path), Some(&Value::from("floe")));
    /// ```
    #[must_use]
    pub fn set_in(&self, path: &[PathKey], value: Value) -> Self {
        let mut root = Value::Object(self.to_index_map());
        assign_at_path(&mut root, path, value);
        self.regate_root(root)
    }

    /// Shallow-merges `sources` into the slot at `path`, vivifying
    /// missing intermediates, and gates the rewritten root.
    #[must_use]
    pub fn merge_in(&self, path: &[PathKey], sources: &[Value]) -> Self {
        let mut root = Value::Object(self.to_index_map());
        merge_at_path(&mut root, path, sources);
        self.regate_root(root)
    }
}

// =============================================================================
// Conversion and Bulk Edit
// =============================================================================

impl FrozenMap {
    /// Clones the entries into a raw `IndexMap`, one layer deep.
    ///
    /// Nested frozen collections stay frozen and keep sharing their
    /// storage.
    #[must_use]
    pub fn to_index_map(&self) -> IndexMap<String, Value> {
        self.slots.as_ref().clone()
    }

    /// Thaws the map into fully raw form, recursively.
    #[must_use]
    pub fn thaw(&self) -> IndexMap<String, Value> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.thaw()))
            .collect()
    }

    /// Hands a thawed copy of the entries to `mutator` and gates whatever
    /// it returns.
    ///
    /// A result whose content equals this map comes back as this map
    /// itself (as a [`Value::Map`]); anything else is frozen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{frozen_map, Value};
    ///
    /// let map = frozen_map! { "kept" => 1, "dropped" => 2 };
    ///
    /// let pruned = map.mutate(|mut entries, _| {
    ///     entries.shift_remove("dropped");
    ///     Value::Object(entries)
    /// });
    /// assert_eq!(pruned, Value::Map(frozen_map! { "kept" => 1 }));
    ///
    /// let untouched = map.mutate(|entries, _| Value::Object(entries));
    /// let Value::Map(untouched) = untouched else { unreachable!() };
    /// assert!(untouched.ptr_eq(&map));
    /// ```
    #[must_use]
    pub fn mutate<F>(&self, mutator: F) -> Value
    where
        F: FnOnce(IndexMap<String, Value>, &Self) -> Value,
    {
        let candidate = mutator(self.thaw(), self);
        self.gate_value(candidate)
    }
}

// =============================================================================
// Iterator Implementations
// =============================================================================

/// Double-ended, exact-size iterator over the entries of a [`FrozenMap`]
/// in insertion order.
pub struct FrozenMapIterator<'a> {
    entries: indexmap::map::Iter<'a, String, Value>,
}

impl<'a> Iterator for FrozenMapIterator<'a> {
    type Item = (&'a String, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl DoubleEndedIterator for FrozenMapIterator<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl ExactSizeIterator for FrozenMapIterator<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Consuming iterator over the entries of a [`FrozenMap`].
///
/// Exclusively owned storage is drained in place; shared storage is cloned
/// first.
pub struct FrozenMapIntoIterator {
    entries: indexmap::map::IntoIter<String, Value>,
}

impl FrozenMapIntoIterator {
    fn new(map: FrozenMap) -> Self {
        let entries = ReferenceCounter::try_unwrap(map.slots)
            .unwrap_or_else(|shared| shared.as_ref().clone());
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl Iterator for FrozenMapIntoIterator {
    type Item = (String, Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl DoubleEndedIterator for FrozenMapIntoIterator {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl ExactSizeIterator for FrozenMapIntoIterator {
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl Default for FrozenMap {
    /// Returns an empty map.
    #[inline]
    fn default() -> Self {
        Self::new(IndexMap::new())
    }
}

impl From<IndexMap<String, Value>> for FrozenMap {
    fn from(slots: IndexMap<String, Value>) -> Self {
        Self::new(slots)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FrozenMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for FrozenMap {
    type Item = (String, Value);
    type IntoIter = FrozenMapIntoIterator;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        FrozenMapIntoIterator::new(self)
    }
}

impl<'a> IntoIterator for &'a FrozenMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = FrozenMapIterator<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for FrozenMap {
    /// Equality is content-fingerprint equality, independent of insertion
    /// order.
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code
    }
}

impl Eq for FrozenMap {}

impl Hash for FrozenMap {
    /// Feeds the stored fingerprint, keeping `Hash` consistent with the
    /// fingerprint-based `Eq`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code.as_u64());
    }
}

impl fmt::Debug for FrozenMap {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FrozenMap")
            .field("hash_code", &self.hash_code)
            .field("slots", &self.slots)
            .finish()
    }
}

impl fmt::Display for FrozenMap {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_mapping(formatter, self.iter())
    }
}

// =============================================================================
// Serde Implementations
// =============================================================================

#[cfg(feature = "serde")]
mod serde_support {
    use super::{FrozenMap, IndexMap, Value};

    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Upper bound on preallocation from untrusted size hints.
    const MAX_PREALLOCATE: usize = 4096;

    impl Serialize for FrozenMap {
        /// Serializes as a plain map in insertion order; the fingerprint
        /// is derived state and never leaves the process.
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut mapping = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                mapping.serialize_entry(key, value)?;
            }
            mapping.end()
        }
    }

    struct FrozenMapVisitor;

    impl<'de> Visitor<'de> for FrozenMapVisitor {
        type Value = FrozenMap;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string-keyed map of values")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
            let mut entries = IndexMap::with_capacity(capacity);
            while let Some((key, value)) = access.next_entry::<String, Value>()? {
                entries.insert(key, value);
            }
            Ok(FrozenMap::new(entries))
        }
    }

    impl<'de> Deserialize<'de> for FrozenMap {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(FrozenMapVisitor)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> FrozenMap {
        [
            ("volume", Value::from(10)),
            ("mode", Value::from("dark")),
        ]
        .into_iter()
        .collect()
    }

    #[rstest]
    fn test_new_normalizes_nested_raw_aggregates() {
        let map: FrozenMap = [
            ("sequence", Value::Array(vec![Value::from(1)])),
            ("mapping", Value::Object(IndexMap::new())),
        ]
        .into_iter()
        .collect();
        assert!(matches!(map.get("sequence"), Some(Value::Vector(_))));
        assert!(matches!(map.get("mapping"), Some(Value::Map(_))));
    }

    #[rstest]
    fn test_equality_ignores_insertion_order() {
        let forward = sample();
        let backward: FrozenMap = [
            ("mode", Value::from("dark")),
            ("volume", Value::from(10)),
        ]
        .into_iter()
        .collect();

        assert_eq!(forward, backward);
        assert_eq!(forward.hash_code(), backward.hash_code());

        // Enumeration still follows each map's own insertion order.
        assert_eq!(forward.keys().next(), Some("volume"));
        assert_eq!(backward.keys().next(), Some("mode"));
    }

    #[rstest]
    fn test_set_with_equal_value_is_elided() {
        let map = sample();
        let unchanged = map.set("volume", Value::from(10));
        assert!(unchanged.ptr_eq(&map));
    }

    #[rstest]
    fn test_set_keeps_position_of_existing_key() {
        let map = sample();
        let updated = map.set("volume", Value::from(60));
        assert_eq!(updated.keys().collect::<Vec<_>>(), vec!["volume", "mode"]);
        assert_eq!(updated.get("volume"), Some(&Value::from(60)));
    }

    #[rstest]
    fn test_set_appends_new_key() {
        let map = sample();
        let extended = map.set("contrast", Value::from(2));
        assert_eq!(
            extended.keys().collect::<Vec<_>>(),
            vec!["volume", "mode", "contrast"]
        );
    }

    #[rstest]
    fn test_remove_absent_key_is_elided() {
        let map = sample();
        assert!(map.remove("missing").ptr_eq(&map));
    }

    #[rstest]
    fn test_remove_preserves_order_of_rest() {
        let map: FrozenMap = [
            ("a", Value::from(1)),
            ("b", Value::from(2)),
            ("c", Value::from(3)),
        ]
        .into_iter()
        .collect();
        let removed = map.remove("b");
        assert_eq!(removed.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[rstest]
    fn test_merge_overrides_later_sources_win() {
        let map = sample();
        let merged = map.merge(&[
            Value::Map([("volume", Value::from(20))].into_iter().collect()),
            Value::Map([("volume", Value::from(30))].into_iter().collect()),
        ]);
        assert_eq!(merged.get("volume"), Some(&Value::from(30)));
        assert_eq!(merged.get("mode"), Some(&Value::from("dark")));
    }

    #[rstest]
    fn test_merge_skips_primitive_sources() {
        let map = sample();
        let merged = map.merge(&[Value::from(1), Value::Null, Value::from("text")]);
        assert!(merged.ptr_eq(&map));
    }

    #[rstest]
    fn test_merge_sequence_source_lands_on_decimal_keys() {
        let map = sample();
        let merged = map.merge(&[Value::Array(vec![Value::from("zero")])]);
        assert_eq!(merged.get("0"), Some(&Value::from("zero")));
    }

    #[rstest]
    fn test_map_identity_is_elided() {
        let map = sample();
        let identity = map.map(|_, value| value.clone());
        assert!(identity.ptr_eq(&map));
    }

    #[rstest]
    fn test_map_transforms_values_keeping_keys() {
        let map = sample();
        let transformed = map.map(|key, value| {
            if key == "volume" {
                Value::from(0)
            } else {
                value.clone()
            }
        });
        assert_eq!(transformed.get("volume"), Some(&Value::from(0)));
        assert_eq!(transformed.keys().collect::<Vec<_>>(), vec!["volume", "mode"]);
    }

    #[rstest]
    fn test_filter_keeping_everything_is_elided() {
        let map = sample();
        assert!(map.filter(|_, _| true).ptr_eq(&map));
    }

    #[rstest]
    fn test_filter_drops_entries() {
        let map = sample();
        let filtered = map.filter(|key, _| key == "mode");
        assert_eq!(filtered.len(), 1);
        assert!(!filtered.contains_key("volume"));
    }

    #[rstest]
    fn test_get_in_decimal_fallback() {
        let map: FrozenMap = [("0", Value::from("zero"))].into_iter().collect();
        assert_eq!(
            map.get_in(&[PathKey::from(0_usize)]),
            Some(&Value::from("zero"))
        );
    }

    #[rstest]
    fn test_set_in_vivifies_and_elides() {
        let map = FrozenMap::default();
        let path = [PathKey::from("profile"), PathKey::from("name")];

        let updated = map.set_in(&path, Value::from("floe"));
        assert_eq!(updated.get_in(&path), Some(&Value::from("floe")));

        let unchanged = updated.set_in(&path, Value::from("floe"));
        assert!(unchanged.ptr_eq(&updated));
    }

    #[rstest]
    fn test_set_in_index_key_writes_decimal() {
        let map = FrozenMap::default();
        let updated = map.set_in(&[PathKey::from(3_usize)], Value::from("three"));
        assert_eq!(updated.get("3"), Some(&Value::from("three")));
    }

    #[rstest]
    fn test_set_in_refuses_root_shape_change() {
        let map = sample();
        let kept = map.set_in(&[], Value::from(5));
        assert!(kept.ptr_eq(&map));
    }

    #[rstest]
    fn test_merge_in_deep_with_vivification() {
        let map = sample();
        let merged = map.merge_in(
            &[PathKey::from("nested")],
            &[Value::Map([("added", Value::from(1))].into_iter().collect())],
        );
        assert_eq!(
            merged.get_in(&[PathKey::from("nested"), PathKey::from("added")]),
            Some(&Value::from(1))
        );
    }

    #[rstest]
    fn test_thaw_is_recursive() {
        let map: FrozenMap = [("nested", Value::Array(vec![Value::from(1)]))]
            .into_iter()
            .collect();
        let raw = map.thaw();
        assert_eq!(raw.get("nested"), Some(&Value::Array(vec![Value::from(1)])));
    }

    #[rstest]
    fn test_mutate_noop_returns_original() {
        let map = sample();
        let result = map.mutate(|entries, _| Value::Object(entries));
        let Value::Map(result) = result else {
            panic!("expected a frozen map");
        };
        assert!(result.ptr_eq(&map));
    }

    #[rstest]
    fn test_equals_only_accepts_frozen_collections() {
        let map = sample();
        assert!(map.equals(&Value::Map(sample())));
        assert!(!map.equals(&Value::Object(map.to_index_map())));
        assert!(!map.equals(&Value::from("dark")));
    }

    #[rstest]
    fn test_display_renders_braces() {
        let map = sample();
        assert_eq!(map.to_string(), "{volume: 10, mode: dark}");
    }

    #[rstest]
    fn test_iteration_order_is_insertion_order() {
        let map = sample();
        let keys: Vec<&str> = map.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["volume", "mode"]);
        assert_eq!(map.values().count(), 2);
        assert_eq!(map.entries().len(), 2);
    }

    #[cfg(not(feature = "arc"))]
    mod auto_trait_pinning {
        use super::FrozenMap;
        use static_assertions::assert_not_impl_any;

        assert_not_impl_any!(FrozenMap: Send, Sync);
    }
}
