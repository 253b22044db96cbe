//! Path keys and the deep-path engine.
//!
//! A [`Path`] addresses a slot anywhere inside a nested value: each
//! [`PathKey`] selects by position in a sequence or by name in a mapping.
//! The engine in this module powers `get_in`, `set_in` and `merge_in` on
//! both collection types.
//!
//! Writes descend copy-on-write: frozen collections along the addressed
//! spine are thawed one layer at a time, while every subtree off the spine
//! keeps sharing its storage untouched. The collections then freeze the
//! rewritten root behind their hash gate, so a deep write that changes
//! nothing still returns the original instance.

use std::fmt;
use std::ops::Deref;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::FloeError;
use crate::value::Value;

/// Number of keys a [`Path`] stores inline before spilling to the heap.
const INLINE_PATH_KEYS: usize = 8;

// =============================================================================
// PathKey
// =============================================================================

/// One step of a [`Path`].
///
/// An [`Index`](PathKey::Index) selects a position in a sequence; a
/// [`Key`](PathKey::Key) selects an entry in a mapping. An index applied to
/// a mapping falls back to its decimal rendering, so `Index(3)` and
/// `Key("3")` address the same mapping entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// A position in a sequence.
    Index(usize),
    /// An entry name in a mapping.
    Key(String),
}

impl fmt::Display for PathKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(formatter, "{index}"),
            Self::Key(key) => formatter.write_str(key),
        }
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl TryFrom<&Value> for PathKey {
    type Error = FloeError;

    /// Interprets a dynamic value as a path key.
    ///
    /// Non-negative integers become indexes and strings become keys; any
    /// other shape fails with [`FloeError::InvalidPath`].
    ///
    /// # Errors
    ///
    /// Returns [`FloeError::InvalidPath`] for negative integers, floats,
    /// booleans, null and aggregates.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(integer) => usize::try_from(*integer)
                .map(Self::Index)
                .map_err(|_| FloeError::InvalidPath { kind: value.kind() }),
            Value::String(key) => Ok(Self::Key(key.clone())),
            other => Err(FloeError::InvalidPath { kind: other.kind() }),
        }
    }
}

// =============================================================================
// Path
// =============================================================================

/// An ordered list of [`PathKey`]s addressing a nested slot.
///
/// Stores up to eight keys inline. Dereferences to `[PathKey]`, which is
/// the form every deep operation accepts.
///
/// # Examples
///
/// ```rust
/// use floe::{Path, PathKey};
///
/// let path: Path = ["profile", "emails"].into_iter().collect();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.to_string(), "profile.emails");
///
/// let mut deeper = path.clone();
/// deeper.push(PathKey::Index(0));
/// assert_eq!(deeper.to_string(), "profile.emails.0");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    keys: SmallVec<[PathKey; INLINE_PATH_KEYS]>,
}

impl Path {
    /// Creates an empty path, which addresses the root itself.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: SmallVec::new(),
        }
    }

    /// Appends one key to the path.
    #[inline]
    pub fn push(&mut self, key: impl Into<PathKey>) {
        self.keys.push(key.into());
    }

    /// Returns the keys as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[PathKey] {
        &self.keys
    }
}

impl Deref for Path {
    type Target = [PathKey];

    fn deref(&self) -> &Self::Target {
        &self.keys
    }
}

impl fmt::Display for Path {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, key) in self.keys.iter().enumerate() {
            if position > 0 {
                formatter.write_str(".")?;
            }
            write!(formatter, "{key}")?;
        }
        Ok(())
    }
}

impl<K: Into<PathKey>> FromIterator<K> for Path {
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl<K: Into<PathKey>> Extend<K> for Path {
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        self.keys.extend(keys.into_iter().map(Into::into));
    }
}

impl From<Vec<PathKey>> for Path {
    fn from(keys: Vec<PathKey>) -> Self {
        Self {
            keys: SmallVec::from_vec(keys),
        }
    }
}

impl From<&[PathKey]> for Path {
    fn from(keys: &[PathKey]) -> Self {
        Self {
            keys: SmallVec::from(keys),
        }
    }
}

impl IntoIterator for Path {
    type Item = PathKey;
    type IntoIter = smallvec::IntoIter<[PathKey; INLINE_PATH_KEYS]>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathKey;
    type IntoIter = std::slice::Iter<'a, PathKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl TryFrom<&Value> for Path {
    type Error = FloeError;

    /// Interprets a dynamic value as a path.
    ///
    /// Only a sequence converts; each slot becomes one key in order. A
    /// bare key is not a path, so even a value that would convert into a
    /// [`PathKey`] is rejected here.
    ///
    /// # Errors
    ///
    /// Returns [`FloeError::InvalidPath`] carrying the shape of the
    /// argument when it is not a sequence, or the shape of the first slot
    /// that is not a valid key.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(slots) => slots.iter().map(PathKey::try_from).collect(),
            Value::Vector(vector) => vector.iter().map(PathKey::try_from).collect(),
            other => Err(FloeError::InvalidPath { kind: other.kind() }),
        }
    }
}

// =============================================================================
// Read-only resolution
// =============================================================================

/// Walks a path through any value, raw or frozen.
///
/// The empty path resolves to the root. Resolution stops with `None` as
/// soon as a key does not address the current slot: an index into a
/// mapping retries as its decimal rendering first, a string key never
/// addresses a sequence, and primitives end every walk.
#[must_use]
pub fn resolve_path<'a>(root: &'a Value, path: &[PathKey]) -> Option<&'a Value> {
    let mut current = root;
    for key in path {
        current = match (current, key) {
            (Value::Array(slots), PathKey::Index(index)) => slots.get(*index)?,
            (Value::Vector(vector), PathKey::Index(index)) => vector.get(*index)?,
            (Value::Object(slots), PathKey::Key(key_text)) => slots.get(key_text)?,
            (Value::Map(map), PathKey::Key(key_text)) => map.get(key_text)?,
            (Value::Object(slots), PathKey::Index(index)) => {
                slots.get(index.to_string().as_str())?
            }
            (Value::Map(map), PathKey::Index(index)) => map.get(&index.to_string())?,
            _ => return None,
        };
    }
    Some(current)
}

impl Value {
    /// Returns the slot addressed by `path`, or `None` when the path does
    /// not resolve.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{frozen_map, PathKey, Value};
    ///
    /// let settings = frozen_map! {
    ///     "volumes" => vec![Value::from(10), Value::from(60)],
    /// };
    /// let root = Value::from(settings);
    ///
    /// let path = [PathKey::from("volumes"), PathKey::from(1)];
    /// assert_eq!(root.get_in(&path), Some(&Value::from(60)));
    /// assert_eq!(root.get_in(&[PathKey::from("missing")]), None);
    /// ```
    #[must_use]
    pub fn get_in(&self, path: &[PathKey]) -> Option<&Self> {
        resolve_path(self, path)
    }
}

// =============================================================================
// Write engine
// =============================================================================

/// Replaces the slot addressed by `path` with `value`, vivifying missing
/// intermediates.
///
/// The empty path replaces the root itself.
pub(crate) fn assign_at_path(root: &mut Value, path: &[PathKey], value: Value) {
    *slot_at_path(root, path) = value;
}

/// Shallow-merges `sources` into the slot addressed by `path`, vivifying
/// missing intermediates.
///
/// The empty path merges into the root itself.
pub(crate) fn merge_at_path(root: &mut Value, path: &[PathKey], sources: &[Value]) {
    merge_into(slot_at_path(root, path), sources);
}

/// Returns the mutable cell addressed by `path`, creating it if needed.
fn slot_at_path<'a>(root: &'a mut Value, path: &[PathKey]) -> &'a mut Value {
    let mut current = root;
    for key in path {
        current = descend_mut(current, key);
    }
    current
}

/// Descends one step, thawing and vivifying as required.
///
/// Frozen slots are thawed one layer so the write stays copy-on-write. A
/// slot that cannot host the key is replaced: an index past the end of a
/// sequence pads it with nulls, while every other mismatch vivifies an
/// empty mapping (with indexes falling back to their decimal rendering).
fn descend_mut<'a>(node: &'a mut Value, key: &PathKey) -> &'a mut Value {
    if node.is_frozen() {
        *node = node.thaw_shallow();
    }
    match key {
        PathKey::Index(index) => match node {
            Value::Array(slots) => {
                if *index >= slots.len() {
                    slots.resize(*index + 1, Value::Null);
                }
                &mut slots[*index]
            }
            other => keyed_slot(other, index.to_string()),
        },
        PathKey::Key(key_text) => keyed_slot(node, key_text.clone()),
    }
}

/// Returns the mutable cell for `key` in a mapping, vivifying the mapping
/// itself when the node has any other shape.
fn keyed_slot(node: &mut Value, key: String) -> &mut Value {
    if !matches!(node, Value::Object(_)) {
        *node = Value::Object(IndexMap::new());
    }
    match node {
        Value::Object(slots) => slots.entry(key).or_insert(Value::Null),
        _ => unreachable!("node was just replaced with a raw mapping"),
    }
}

/// Shallow-merges each source onto `slot` in order.
///
/// Sequence sources contribute position entries and mapping sources
/// contribute key entries; sources of any other shape are skipped. A slot
/// that is not an aggregate is replaced by an empty mapping before the
/// first entry lands.
pub(crate) fn merge_into(slot: &mut Value, sources: &[Value]) {
    if slot.is_frozen() {
        *slot = slot.thaw_shallow();
    }
    if !matches!(slot, Value::Array(_) | Value::Object(_)) {
        *slot = Value::Object(IndexMap::new());
    }
    for source in sources {
        match source {
            Value::Array(source_slots) => merge_sequence_entries(slot, source_slots),
            Value::Vector(vector) => merge_sequence_entries(slot, vector.as_slice()),
            Value::Object(entries) => {
                for (key, value) in entries {
                    merge_entry(slot, key, value);
                }
            }
            Value::Map(map) => {
                for (key, value) in map.iter() {
                    merge_entry(slot, key, value);
                }
            }
            _ => {}
        }
    }
}

fn merge_sequence_entries(slot: &mut Value, source_slots: &[Value]) {
    match slot {
        Value::Array(slots) => {
            for (index, value) in source_slots.iter().enumerate() {
                if index < slots.len() {
                    slots[index] = value.clone();
                } else {
                    slots.push(value.clone());
                }
            }
        }
        Value::Object(slots) => {
            for (index, value) in source_slots.iter().enumerate() {
                slots.insert(index.to_string(), value.clone());
            }
        }
        _ => {}
    }
}

fn merge_entry(slot: &mut Value, key: &str, value: &Value) {
    match slot {
        Value::Array(slots) => {
            // Only position-shaped keys can land in a sequence.
            if let Ok(index) = key.parse::<usize>() {
                if index >= slots.len() {
                    slots.resize(index + 1, Value::Null);
                }
                slots[index] = value.clone();
            }
        }
        Value::Object(slots) => {
            slots.insert(key.to_string(), value.clone());
        }
        _ => {}
    }
}

// =============================================================================
// Tests
// =============================================================================
