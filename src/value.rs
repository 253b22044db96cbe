//! The dynamic value model shared by every collection in the crate.
//!
//! [`Value`] is a JSON-shaped sum type with one twist: aggregate shapes
//! exist in two representations. [`Value::Array`] and [`Value::Object`] are
//! *raw* aggregates, plain mutable building material. [`Value::Vector`] and
//! [`Value::Map`] hold the frozen collections this crate is about. Freezing
//! converts the former into the latter recursively; thawing converts back.
//!
//! Raw and frozen representations of the same content are deliberately
//! indistinguishable to the hashing scheme (see [`crate::hash`]), which is
//! what lets every operation build a cheap raw candidate, hash it, and
//! discard it when nothing changed.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;

use crate::frozen::{FrozenMap, FrozenVector};

// =============================================================================
// ValueKind
// =============================================================================

/// The shape of a [`Value`], blind to representation.
///
/// A raw array and a frozen vector are both [`ValueKind::Sequence`]; a raw
/// object and a frozen map are both [`ValueKind::Mapping`]. Use
/// [`Value::is_frozen`] when the representation matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The null value.
    Null,
    /// A boolean.
    Bool,
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit float.
    Float,
    /// A UTF-8 string.
    String,
    /// An ordered sequence of values, raw or frozen.
    Sequence,
    /// A string-keyed mapping, raw or frozen.
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        };
        formatter.write_str(name)
    }
}

// =============================================================================
// Value
// =============================================================================

/// A dynamically typed value.
///
/// # Examples
///
/// ```rust
/// use floe::Value;
///
/// let raw = Value::Array(vec![Value::from(1), Value::from("two")]);
/// let frozen = raw.clone().freeze();
///
/// assert!(!raw.is_frozen());
/// assert!(frozen.is_frozen());
/// assert_eq!(frozen.thaw(), raw);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A raw, thawed sequence.
    Array(Vec<Value>),
    /// A raw, thawed string-keyed mapping.
    Object(IndexMap<String, Value>),
    /// A frozen sequence.
    Vector(FrozenVector),
    /// A frozen string-keyed mapping.
    Map(FrozenMap),
}

impl Value {
    /// Returns the shape of this value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Array(_) | Self::Vector(_) => ValueKind::Sequence,
            Self::Object(_) | Self::Map(_) => ValueKind::Mapping,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for either sequence representation.
    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Vector(_))
    }

    /// Returns `true` for either mapping representation.
    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Map(_))
    }

    /// Returns `true` for frozen collections.
    #[inline]
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        matches!(self, Self::Vector(_) | Self::Map(_))
    }

    /// Returns the boolean if this value is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(boolean) => Some(*boolean),
            _ => None,
        }
    }

    /// Returns the integer if this value is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(integer) => Some(*integer),
            _ => None,
        }
    }

    /// Returns the float if this value is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(float) => Some(*float),
            _ => None,
        }
    }

    /// Returns the string slice if this value is a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }

    /// Returns the frozen vector if this value is one.
    #[inline]
    #[must_use]
    pub const fn as_vector(&self) -> Option<&FrozenVector> {
        match self {
            Self::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    /// Returns the frozen map if this value is one.
    #[inline]
    #[must_use]
    pub const fn as_map(&self) -> Option<&FrozenMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Freezes this value, converting raw aggregates into frozen
    /// collections recursively.
    ///
    /// Primitives and already-frozen collections pass through unchanged,
    /// so freezing is idempotent. This is the normalization step every
    /// collection constructor applies to each slot it stores.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::Value;
    ///
    /// let frozen = Value::Array(vec![Value::from(1)]).freeze();
    /// assert!(matches!(frozen, Value::Vector(_)));
    /// assert_eq!(frozen.clone().freeze(), frozen);
    /// ```
    #[must_use]
    pub fn freeze(self) -> Self {
        match self {
            Self::Array(slots) => Self::Vector(FrozenVector::new(slots)),
            Self::Object(slots) => Self::Map(FrozenMap::new(slots)),
            other => other,
        }
    }

    /// Thaws this value into fully raw form, recursively.
    ///
    /// Frozen collections become raw aggregates all the way down; the
    /// result contains no [`Value::Vector`] or [`Value::Map`] anywhere.
    #[must_use]
    pub fn thaw(&self) -> Self {
        match self {
            Self::Array(slots) => Self::Array(slots.iter().map(Self::thaw).collect()),
            Self::Object(slots) => Self::Object(
                slots
                    .iter()
                    .map(|(key, value)| (key.clone(), value.thaw()))
                    .collect(),
            ),
            Self::Vector(vector) => {
                Self::Array(vector.iter().map(Self::thaw).collect())
            }
            Self::Map(map) => Self::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.thaw()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Thaws only the outermost layer of a frozen collection.
    ///
    /// Nested frozen collections stay frozen and keep sharing their
    /// storage. This is the copy-on-write step the deep-path engine uses
    /// while descending, so a write touches only the spine of the path.
    #[must_use]
    pub(crate) fn thaw_shallow(&self) -> Self {
        match self {
            Self::Vector(vector) => Self::Array(vector.to_vec()),
            Self::Map(map) => Self::Object(map.to_index_map()),
            other => other.clone(),
        }
    }

    /// Compares two values under a documented total order.
    ///
    /// The order ranks shapes first (null, then booleans, then numbers,
    /// then strings, then sequences, then mappings) and compares within a
    /// shape:
    ///
    /// - numbers compare numerically across [`Value::Int`] and
    ///   [`Value::Float`], with NaN ordered after every other number,
    /// - strings compare lexicographically by code point,
    /// - sequences compare slot by slot, shorter prefix first,
    /// - mappings compare entry by entry after sorting keys, so the
    ///   result is independent of insertion order.
    ///
    /// This is the comparator behind [`FrozenVector::sort`].
    ///
    /// [`FrozenVector::sort`]: crate::FrozenVector::sort
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        let ranks = (shape_rank(self), shape_rank(other));
        if ranks.0 != ranks.1 {
            return ranks.0.cmp(&ranks.1);
        }
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(left), Self::Bool(right)) => left.cmp(right),
            (Self::Int(left), Self::Int(right)) => left.cmp(right),
            (Self::Int(left), Self::Float(right)) => compare_floats(*left as f64, *right),
            (Self::Float(left), Self::Int(right)) => compare_floats(*left, *right as f64),
            (Self::Float(left), Self::Float(right)) => compare_floats(*left, *right),
            (Self::String(left), Self::String(right)) => left.cmp(right),
            _ if self.is_sequence() => compare_sequences(
                sequence_slots(self).unwrap_or(&[]),
                sequence_slots(other).unwrap_or(&[]),
            ),
            _ => compare_mappings(self, other),
        }
    }
}

/// Rank used to order values of different shapes.
const fn shape_rank(value: &Value) -> u8 {
    match value.kind() {
        ValueKind::Null => 0,
        ValueKind::Bool => 1,
        ValueKind::Int | ValueKind::Float => 2,
        ValueKind::String => 3,
        ValueKind::Sequence => 4,
        ValueKind::Mapping => 5,
    }
}

/// Orders floats totally, NaN after everything else.
fn compare_floats(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => left.total_cmp(&right),
    }
}

/// Borrows the slots of either sequence representation.
fn sequence_slots(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Array(slots) => Some(slots),
        Value::Vector(vector) => Some(vector.as_slice()),
        _ => None,
    }
}

fn compare_sequences(left: &[Value], right: &[Value]) -> Ordering {
    for (left_slot, right_slot) in left.iter().zip(right) {
        let ordering = left_slot.total_cmp(right_slot);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

fn compare_mappings(left: &Value, right: &Value) -> Ordering {
    let left_entries = sorted_entries(left);
    let right_entries = sorted_entries(right);
    for ((left_key, left_slot), (right_key, right_slot)) in
        left_entries.iter().zip(&right_entries)
    {
        let key_ordering = left_key.cmp(right_key);
        if key_ordering != Ordering::Equal {
            return key_ordering;
        }
        let slot_ordering = left_slot.total_cmp(right_slot);
        if slot_ordering != Ordering::Equal {
            return slot_ordering;
        }
    }
    left_entries.len().cmp(&right_entries.len())
}

fn sorted_entries(value: &Value) -> Vec<(&str, &Value)> {
    let mut entries: Vec<(&str, &Value)> = match value {
        Value::Object(slots) => slots.iter().map(|(key, slot)| (key.as_str(), slot)).collect(),
        Value::Map(map) => map.iter().map(|(key, slot)| (key.as_str(), slot)).collect(),
        _ => Vec::new(),
    };
    entries.sort_unstable_by(|(left, _), (right, _)| left.cmp(right));
    entries
}

// =============================================================================
// Factory entry point
// =============================================================================

/// Freezes a value, the function form of [`Value::freeze`].
///
/// Array-shaped input becomes a [`FrozenVector`], object-shaped input a
/// [`FrozenMap`], and anything else passes through unchanged.
///
/// # Examples
///
/// ```rust
/// use floe::{freeze, Value};
///
/// let vector = freeze(Value::Array(vec![Value::from(1), Value::from(2)]));
/// assert!(matches!(vector, Value::Vector(_)));
///
/// let untouched = freeze(Value::from("already a primitive"));
/// assert_eq!(untouched, Value::from("already a primitive"));
/// ```
#[inline]
#[must_use]
pub fn freeze(value: Value) -> Value {
    value.freeze()
}

// =============================================================================
// Trait implementations
// =============================================================================

impl Default for Value {
    /// Returns [`Value::Null`].
    fn default() -> Self {
        Self::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(boolean) => write!(formatter, "{boolean}"),
            Self::Int(integer) => write!(formatter, "{integer}"),
            Self::Float(float) => write!(formatter, "{float}"),
            Self::String(string) => formatter.write_str(string),
            Self::Array(slots) => display_sequence(formatter, slots.iter()),
            Self::Vector(vector) => display_sequence(formatter, vector.iter()),
            Self::Object(slots) => display_mapping(formatter, slots.iter()),
            Self::Map(map) => display_mapping(formatter, map.iter()),
        }
    }
}

pub(crate) fn display_sequence<'a>(
    formatter: &mut fmt::Formatter<'_>,
    slots: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    formatter.write_str("[")?;
    for (index, slot) in slots.enumerate() {
        if index > 0 {
            formatter.write_str(", ")?;
        }
        write!(formatter, "{slot}")?;
    }
    formatter.write_str("]")
}

pub(crate) fn display_mapping<'a>(
    formatter: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
) -> fmt::Result {
    formatter.write_str("{")?;
    for (index, (key, slot)) in entries.enumerate() {
        if index > 0 {
            formatter.write_str(", ")?;
        }
        write!(formatter, "{key}: {slot}")?;
    }
    formatter.write_str("}")
}

impl From<bool> for Value {
    fn from(boolean: bool) -> Self {
        Self::Bool(boolean)
    }
}

impl From<i32> for Value {
    fn from(integer: i32) -> Self {
        Self::Int(i64::from(integer))
    }
}

impl From<i64> for Value {
    fn from(integer: i64) -> Self {
        Self::Int(integer)
    }
}

impl From<u32> for Value {
    fn from(integer: u32) -> Self {
        Self::Int(i64::from(integer))
    }
}

impl From<f64> for Value {
    fn from(float: f64) -> Self {
        Self::Float(float)
    }
}

impl From<&str> for Value {
    fn from(string: &str) -> Self {
        Self::String(string.to_string())
    }
}

impl From<String> for Value {
    fn from(string: String) -> Self {
        Self::String(string)
    }
}

impl From<Vec<Self>> for Value {
    fn from(slots: Vec<Self>) -> Self {
        Self::Array(slots)
    }
}

impl From<IndexMap<String, Self>> for Value {
    fn from(slots: IndexMap<String, Self>) -> Self {
        Self::Object(slots)
    }
}

impl From<FrozenVector> for Value {
    fn from(vector: FrozenVector) -> Self {
        Self::Vector(vector)
    }
}

impl From<FrozenMap> for Value {
    fn from(map: FrozenMap) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    /// Converts `None` into [`Value::Null`].
    fn from(option: Option<T>) -> Self {
        option.map_or(Self::Null, Into::into)
    }
}

// =============================================================================
// Serde support
// =============================================================================

#[cfg(feature = "serde")]
mod serde_support {
    use super::{IndexMap, Value};

    use std::fmt;

    use serde::de::{MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Upper bound on preallocation from untrusted size hints.
    const MAX_PREALLOCATE: usize = 4096;

    impl Serialize for Value {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                Self::Null => serializer.serialize_unit(),
                Self::Bool(boolean) => serializer.serialize_bool(*boolean),
                Self::Int(integer) => serializer.serialize_i64(*integer),
                Self::Float(float) => serializer.serialize_f64(*float),
                Self::String(string) => serializer.serialize_str(string),
                Self::Array(slots) => serialize_sequence(serializer, slots.iter(), slots.len()),
                Self::Vector(vector) => {
                    serialize_sequence(serializer, vector.iter(), vector.len())
                }
                Self::Object(slots) => serialize_mapping(serializer, slots.iter(), slots.len()),
                Self::Map(map) => serialize_mapping(serializer, map.iter(), map.len()),
            }
        }
    }

    fn serialize_sequence<'a, S>(
        serializer: S,
        slots: impl Iterator<Item = &'a Value>,
        length: usize,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut sequence = serializer.serialize_seq(Some(length))?;
        for slot in slots {
            sequence.serialize_element(slot)?;
        }
        sequence.end()
    }

    fn serialize_mapping<'a, S>(
        serializer: S,
        entries: impl Iterator<Item = (&'a String, &'a Value)>,
        length: usize,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut mapping = serializer.serialize_map(Some(length))?;
        for (key, slot) in entries {
            mapping.serialize_entry(key, slot)?;
        }
        mapping.end()
    }

    impl<'de> Deserialize<'de> for Value {
        /// Deserializes into raw representations; freeze the result to
        /// obtain frozen collections.
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(ValueVisitor)
        }
    }

    struct ValueVisitor;

    impl<'de> Visitor<'de> for ValueVisitor {
        type Value = Value;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("any value")
        }

        fn visit_bool<E>(self, boolean: bool) -> Result<Self::Value, E> {
            Ok(Value::Bool(boolean))
        }

        fn visit_i64<E>(self, integer: i64) -> Result<Self::Value, E> {
            Ok(Value::Int(integer))
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E>(self, integer: u64) -> Result<Self::Value, E> {
            // Values past i64::MAX fall back to the float representation.
            Ok(i64::try_from(integer)
                .map_or_else(|_| Value::Float(integer as f64), Value::Int))
        }

        fn visit_f64<E>(self, float: f64) -> Result<Self::Value, E> {
            Ok(Value::Float(float))
        }

        fn visit_str<E>(self, string: &str) -> Result<Self::Value, E> {
            Ok(Value::String(string.to_string()))
        }

        fn visit_string<E>(self, string: String) -> Result<Self::Value, E> {
            Ok(Value::String(string))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(Value::Null)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(Value::Null)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(Self)
        }

        fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
            let mut slots = Vec::with_capacity(capacity);
            while let Some(slot) = access.next_element()? {
                slots.push(slot);
            }
            Ok(Value::Array(slots))
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
            let mut slots = IndexMap::with_capacity(capacity);
            while let Some((key, slot)) = access.next_entry::<String, Value>()? {
                slots.insert(key, slot);
            }
            Ok(Value::Object(slots))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
