//! Frozen (immutable) vector of dynamic values.
//!
//! This module provides [`FrozenVector`], an immutable ordered sequence of
//! [`Value`]s that behaves like a native vector but can never be mutated in
//! place.
//!
//! # Overview
//!
//! A `FrozenVector` freezes its contents recursively at construction and
//! stamps the raw input with a content fingerprint. Every "mutating"
//! operation builds a raw candidate, applies the native edit, and routes the
//! candidate through a hash gate: when the candidate hashes identically to
//! the original, the original instance itself is returned (observable
//! through [`FrozenVector::ptr_eq`]) and nothing is allocated.
//!
//! Three operations deliberately skip the gate and always construct a new
//! vector even when the content is unchanged: [`concat`], [`slice`] and
//! [`unshift`] (and therefore [`pop`] and [`shift`], which are defined in
//! terms of `slice`).
//!
//! # Examples
//!
//! ```rust
//! use floe::{FrozenVector, Value};
//!
//! let scores = FrozenVector::new(vec![Value::from(3), Value::from(1)]);
//!
//! // Structural operations return new vectors...
//! let sorted = scores.sort();
//! assert_eq!(sorted.get(0), Some(&Value::from(1)));
//! assert_eq!(scores.get(0), Some(&Value::from(3))); // original unchanged
//!
//! // ...unless they change nothing.
//! let same = sorted.sort();
//! assert!(same.ptr_eq(&sorted));
//! ```
//!
//! [`concat`]: FrozenVector::concat
//! [`slice`]: FrozenVector::slice
//! [`unshift`]: FrozenVector::unshift
//! [`pop`]: FrozenVector::pop
//! [`shift`]: FrozenVector::shift

use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use super::ReferenceCounter;

use crate::error::FloeError;
use crate::hash::{hash_sequence, hash_value, HashCode};
use crate::path::{assign_at_path, merge_at_path, resolve_path, PathKey};
use crate::value::{display_sequence, Value};

// =============================================================================
// FrozenVector Definition
// =============================================================================

/// A frozen (immutable) ordered sequence of [`Value`]s.
///
/// The backing storage is reference counted and shared between every handle
/// returned by a no-op operation, so referential identity survives edits
/// that change nothing.
///
/// # Time Complexity
///
/// | Operation          | Complexity                          |
/// |--------------------|-------------------------------------|
/// | `new`              | O(N) over the raw surface           |
/// | `get` / `len`      | O(1)                                |
/// | `push` / `set`     | O(N) clone + O(1) hash per slot     |
/// | `map` / `filter`   | O(N)                                |
/// | `clone` (elision)  | O(1), shares storage                |
///
/// Hashing a candidate never descends into frozen slots: each contributes
/// its stored fingerprint in O(1).
///
/// # Examples
///
/// ```rust
/// use floe::{FrozenVector, Value};
///
/// let vector: FrozenVector = (1..=3).collect();
/// assert_eq!(vector.len(), 3);
/// assert_eq!(vector.get(1), Some(&Value::from(2)));
/// ```
#[derive(Clone)]
pub struct FrozenVector {
    /// Content fingerprint computed from the raw input.
    hash_code: HashCode,
    /// Normalized slots: primitives or frozen collections, never raw.
    slots: ReferenceCounter<Vec<Value>>,
}

impl FrozenVector {
    /// Freezes a raw sequence of values.
    ///
    /// The raw input is fingerprinted first, then every slot is normalized:
    /// raw arrays become nested `FrozenVector`s, raw objects become nested
    /// [`FrozenMap`](crate::FrozenMap)s, and primitives and already-frozen
    /// collections are stored unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector = FrozenVector::new(vec![
    ///     Value::from(1),
    ///     Value::Array(vec![Value::from(2)]),
    /// ]);
    ///
    /// // The nested raw array was frozen during construction.
    /// assert!(matches!(vector.get(1), Some(Value::Vector(_))));
    /// ```
    #[must_use]
    pub fn new(slots: Vec<Value>) -> Self {
        let hash_code = hash_sequence(&slots);
        Self::with_hash(hash_code, slots)
    }

    /// Builds a vector from raw slots and their precomputed fingerprint.
    ///
    /// The gate computes the fingerprint to decide whether to construct at
    /// all; passing it in here keeps construction single-hash.
    fn with_hash(hash_code: HashCode, slots: Vec<Value>) -> Self {
        Self {
            hash_code,
            slots: ReferenceCounter::new(slots.into_iter().map(Value::freeze).collect()),
        }
    }

    /// Routes a raw candidate through the change-detection gate.
    ///
    /// A candidate that hashes identically to this vector is discarded and
    /// a storage-sharing handle to this vector is returned instead.
    fn gate(&self, candidate: Vec<Value>) -> Self {
        let hash_code = hash_sequence(&candidate);
        if hash_code == self.hash_code {
            self.clone()
        } else {
            Self::with_hash(hash_code, candidate)
        }
    }

    /// Gates an arbitrary candidate value produced by a fold or bulk edit.
    ///
    /// Unchanged content yields this vector itself (as a [`Value::Vector`]);
    /// changed content is frozen.
    fn gate_value(&self, candidate: Value) -> Value {
        if hash_value(&candidate) == self.hash_code {
            Value::Vector(self.clone())
        } else {
            candidate.freeze()
        }
    }

    /// Returns the content fingerprint stamped at construction.
    #[inline]
    #[must_use]
    pub const fn hash_code(&self) -> HashCode {
        self.hash_code
    }

    /// Returns `true` when both handles share the same backing storage.
    ///
    /// This is how no-op elision is observed: an operation that changed
    /// nothing hands back the original storage, not a copy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector = FrozenVector::new(vec![Value::from(1)]);
    /// let same = vector.map(|slot| slot.clone());
    /// let rebuilt = FrozenVector::new(vec![Value::from(1)]);
    ///
    /// assert!(same.ptr_eq(&vector));      // elided: same storage
    /// assert!(!rebuilt.ptr_eq(&vector));  // equal content, fresh storage
    /// assert_eq!(rebuilt, vector);
    /// ```
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.slots, &other.slots)
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the vector holds no slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns a reference to the slot at `index`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=3).collect();
    /// assert_eq!(vector.get(0), Some(&Value::from(1)));
    /// assert_eq!(vector.get(9), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.slots.get(index)
    }

    /// Returns a reference to the first slot.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.slots.first()
    }

    /// Returns a reference to the last slot.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Value> {
        self.slots.last()
    }

    /// Borrows the slots as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        self.slots.as_slice()
    }

    /// Returns the index of the first slot equal to `value`.
    #[must_use]
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.iter().position(|slot| slot == value)
    }

    /// Returns the index of the last slot equal to `value`.
    #[must_use]
    pub fn last_index_of(&self, value: &Value) -> Option<usize> {
        self.iter().rposition(|slot| slot == value)
    }

    /// Returns `true` if some slot equals `value`.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.index_of(value).is_some()
    }

    /// Returns the index of the first slot the predicate accepts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=5).collect();
    /// let found = vector.find_index(|slot| slot.as_int().is_some_and(|n| n > 3));
    /// assert_eq!(found, Some(3));
    /// ```
    #[must_use]
    pub fn find_index<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&Value) -> bool,
    {
        self.iter().position(|slot| predicate(slot))
    }

    /// Renders every slot with its `Display` form, separated by
    /// `separator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector = FrozenVector::new(vec![
    ///     Value::from("a"),
    ///     Value::from(1),
    ///     Value::Null,
    /// ]);
    /// assert_eq!(vector.join("-"), "a-1-null");
    /// ```
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        let mut rendered = String::new();
        for (position, slot) in self.iter().enumerate() {
            if position > 0 {
                rendered.push_str(separator);
            }
            let _ = write!(rendered, "{slot}");
        }
        rendered
    }

    /// Returns an iterator over the slot indexes.
    #[must_use]
    pub fn keys(&self) -> std::ops::Range<usize> {
        0..self.len()
    }

    /// Returns an iterator over the slots; an alias for [`iter`].
    ///
    /// [`iter`]: FrozenVector::iter
    #[must_use]
    pub fn values(&self) -> FrozenVectorIterator<'_> {
        self.iter()
    }

    /// Returns an iterator over `(index, slot)` pairs.
    #[must_use]
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (usize, &Value)> + ExactSizeIterator {
        self.iter().enumerate()
    }

    /// Returns a fresh iterator over the slots.
    #[must_use]
    pub fn iter(&self) -> FrozenVectorIterator<'_> {
        FrozenVectorIterator {
            slots: self.slots.iter(),
        }
    }

    /// Compares this vector with any value by content fingerprint.
    ///
    /// Only frozen collections can compare equal; a raw aggregate or a
    /// primitive is never equal, regardless of content.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector = FrozenVector::new(vec![Value::from(1)]);
    /// let twin = FrozenVector::new(vec![Value::from(1)]);
    ///
    /// assert!(vector.equals(&Value::Vector(twin)));
    /// assert!(!vector.equals(&Value::Array(vec![Value::from(1)])));
    /// ```
    #[must_use]
    pub fn equals(&self, other: &Value) -> bool {
        match other {
            Value::Vector(vector) => vector.hash_code == self.hash_code,
            Value::Map(map) => map.hash_code() == self.hash_code,
            _ => false,
        }
    }
}

// =============================================================================
// Structural Operations (gate-routed)
// =============================================================================

impl FrozenVector {
    /// Maps every slot through `transform` and gates the result.
    ///
    /// A transform that reproduces every slot unchanged returns this
    /// vector itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=3).collect();
    ///
    /// let doubled = vector.map(|slot| match slot {
    ///     Value::Int(n) => Value::from(n * 2),
    ///     other => other.clone(),
    /// });
    /// assert_eq!(doubled.get(0), Some(&Value::from(2)));
    ///
    /// let identity = vector.map(|slot| slot.clone());
    /// assert!(identity.ptr_eq(&vector));
    /// ```
    #[must_use]
    pub fn map<F>(&self, mut transform: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        let mut candidate = Vec::with_capacity(self.len());
        for slot in self.iter() {
            candidate.push(transform(slot));
        }
        self.gate(candidate)
    }

    /// Keeps the slots the predicate accepts and gates the result.
    ///
    /// A predicate that keeps every slot returns this vector itself.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Value) -> bool,
    {
        let mut candidate = Vec::with_capacity(self.len());
        for slot in self.iter() {
            if predicate(slot) {
                candidate.push(slot.clone());
            }
        }
        self.gate(candidate)
    }

    /// Replaces every slot with `value` and gates the result.
    #[must_use]
    pub fn fill(&self, value: Value) -> Self {
        self.fill_range(value, 0, self.len())
    }

    /// Replaces the slots in `start..end` with `value` and gates the
    /// result. Both bounds clamp to the length.
    #[must_use]
    pub fn fill_range(&self, value: Value, start: usize, end: usize) -> Self {
        let mut candidate = self.to_vec();
        let length = candidate.len();
        let start = start.min(length);
        let end = end.min(length).max(start);
        candidate[start..end].fill(value);
        self.gate(candidate)
    }

    /// Copies the slots in `start..end` onto position `target`, keeping
    /// the length unchanged, and gates the result.
    ///
    /// Every bound clamps to the length; the copy also stops at the end of
    /// the vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::FrozenVector;
    ///
    /// let vector: FrozenVector = (1..=5).collect();
    /// let copied = vector.copy_within(0, 3, 5);
    /// assert_eq!(copied.join(","), "4,5,3,4,5");
    /// ```
    #[must_use]
    pub fn copy_within(&self, target: usize, start: usize, end: usize) -> Self {
        let mut candidate = self.to_vec();
        let length = candidate.len();
        let target = target.min(length);
        let start = start.min(length);
        let end = end.min(length).max(start);
        let count = (end - start).min(length - target);
        let copied: Vec<Value> = candidate[start..start + count].to_vec();
        for (offset, slot) in copied.into_iter().enumerate() {
            candidate[target + offset] = slot;
        }
        self.gate(candidate)
    }

    /// Sorts the slots under [`Value::total_cmp`] and gates the result.
    ///
    /// An already-sorted vector comes back as itself.
    #[must_use]
    pub fn sort(&self) -> Self {
        self.sort_by(Value::total_cmp)
    }

    /// Sorts the slots with a caller-supplied comparator and gates the
    /// result. The sort is stable.
    #[must_use]
    pub fn sort_by<F>(&self, comparator: F) -> Self
    where
        F: FnMut(&Value, &Value) -> Ordering,
    {
        let mut candidate = self.to_vec();
        candidate.sort_by(comparator);
        self.gate(candidate)
    }

    /// Removes `delete_count` slots at `start`, inserts `items` there, and
    /// gates the result.
    ///
    /// `start` clamps to the length and `delete_count` to the remaining
    /// tail. Deleting nothing and inserting nothing returns this vector
    /// itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=4).collect();
    /// let spliced = vector.splice(1, 2, vec![Value::from(9)]);
    /// assert_eq!(spliced.join(","), "1,9,4");
    ///
    /// let untouched = vector.splice(2, 0, Vec::new());
    /// assert!(untouched.ptr_eq(&vector));
    /// ```
    #[must_use]
    pub fn splice<I>(&self, start: usize, delete_count: usize, items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut candidate = self.to_vec();
        let start = start.min(candidate.len());
        let removed = delete_count.min(candidate.len() - start);
        let tail = candidate.split_off(start);
        candidate.extend(items);
        candidate.extend(tail.into_iter().skip(removed));
        self.gate(candidate)
    }

    /// Appends one value and gates the result.
    ///
    /// Routed through the gate like every structural edit; appending
    /// always grows the vector, so the gate never actually elides it.
    #[must_use]
    pub fn push(&self, value: Value) -> Self {
        let mut candidate = self.to_vec();
        candidate.push(value);
        self.gate(candidate)
    }

    /// Replaces the slot at `index`, or appends when `index == len()`.
    ///
    /// Writing a value equal to the one already stored returns this
    /// vector itself.
    ///
    /// # Errors
    ///
    /// Returns [`FloeError::IndexOutOfRange`] when `index > len()`; the
    /// vector never grows sparsely.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FloeError, FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=3).collect();
    ///
    /// let replaced = vector.set(0, Value::from(9))?;
    /// assert_eq!(replaced.get(0), Some(&Value::from(9)));
    ///
    /// let appended = vector.set(3, Value::from(4))?;
    /// assert_eq!(appended.len(), 4);
    ///
    /// let unchanged = vector.set(0, Value::from(1))?;
    /// assert!(unchanged.ptr_eq(&vector));
    ///
    /// assert_eq!(
    ///     vector.set(5, Value::Null),
    ///     Err(FloeError::IndexOutOfRange { index: 5, length: 3 })
    /// );
    /// # Ok::<(), FloeError>(())
    /// ```
    pub fn set(&self, index: usize, value: Value) -> Result<Self, FloeError> {
        if index > self.len() {
            return Err(FloeError::IndexOutOfRange {
                index,
                length: self.len(),
            });
        }
        let mut candidate = self.to_vec();
        if index == candidate.len() {
            candidate.push(value);
        } else {
            candidate[index] = value;
        }
        Ok(self.gate(candidate))
    }
}

// =============================================================================
// Structural Operations (always construct)
// =============================================================================

impl FrozenVector {
    /// Returns a new vector with `items` appended.
    ///
    /// Always constructs, even when `items` is empty; this asymmetry with
    /// the gated operations is deliberate and relied upon.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=2).collect();
    /// let copy = vector.concat(Vec::new());
    ///
    /// assert_eq!(copy, vector);        // same content
    /// assert!(!copy.ptr_eq(&vector));  // fresh storage regardless
    /// ```
    #[must_use]
    pub fn concat<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut candidate = self.to_vec();
        candidate.extend(items);
        Self::new(candidate)
    }

    /// Returns a new vector holding the slots in `start..end`, clamped to
    /// the length. Always constructs.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let length = self.len();
        let start = start.min(length);
        let end = end.min(length).max(start);
        Self::new(self.slots[start..end].to_vec())
    }

    /// Returns a new vector with `items` prepended in order. Always
    /// constructs.
    #[must_use]
    pub fn unshift<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut candidate: Vec<Value> = items.into_iter().collect();
        candidate.extend(self.iter().cloned());
        Self::new(candidate)
    }

    /// Returns a new vector without the last slot. Always constructs.
    #[must_use]
    pub fn pop(&self) -> Self {
        self.slice(0, self.len().saturating_sub(1))
    }

    /// Returns a new vector without the first slot. Always constructs.
    #[must_use]
    pub fn shift(&self) -> Self {
        self.slice(1, self.len())
    }
}

// =============================================================================
// Folds
// =============================================================================

impl FrozenVector {
    /// Folds the slots left to right and gates the final value.
    ///
    /// A fold that reproduces this vector's content returns this vector
    /// itself (as a [`Value::Vector`]); any other result is frozen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=3).collect();
    /// let sum = vector.reduce(Value::from(0), |accumulator, slot| {
    ///     match (accumulator, slot) {
    ///         (Value::Int(total), Value::Int(n)) => Value::from(total + n),
    ///         (accumulator, _) => accumulator,
    ///     }
    /// });
    /// assert_eq!(sum, Value::from(6));
    /// ```
    #[must_use]
    pub fn reduce<F>(&self, initial: Value, mut fold: F) -> Value
    where
        F: FnMut(Value, &Value) -> Value,
    {
        let mut accumulator = initial;
        for slot in self.iter() {
            accumulator = fold(accumulator, slot);
        }
        self.gate_value(accumulator)
    }

    /// Folds the slots right to left and gates the final value.
    #[must_use]
    pub fn reduce_right<F>(&self, initial: Value, mut fold: F) -> Value
    where
        F: FnMut(Value, &Value) -> Value,
    {
        let mut accumulator = initial;
        for slot in self.iter().rev() {
            accumulator = fold(accumulator, slot);
        }
        self.gate_value(accumulator)
    }
}

// =============================================================================
// Path Operations
// =============================================================================

impl FrozenVector {
    /// Returns the slot addressed by `path`, walking through nested
    /// collections of either kind.
    ///
    /// Absence short-circuits to `None`: a missing slot, an index past the
    /// end, or a key of the wrong kind for the container it meets. The
    /// empty path addresses the vector itself, which is not a slot, so it
    /// also resolves to `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, PathKey, Value};
    ///
    /// let vector = FrozenVector::new(vec![Value::Array(vec![
    ///     Value::from("nested"),
    /// ])]);
    ///
    /// let path = [PathKey::from(0_usize), PathKey::from(0_usize)];
    /// assert_eq!(vector.get_in(&path), Some(&Value::from("nested")));
    /// assert_eq!(vector.get_in(&[PathKey::from(7_usize)]), None);
    /// ```
    #[must_use]
    pub fn get_in(&self, path: &[PathKey]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let slot = match first {
            PathKey::Index(index) => self.get(*index)?,
            PathKey::Key(_) => return None,
        };
        resolve_path(slot, rest)
    }

    /// Writes `value` at `path`, vivifying missing intermediates, and
    /// gates the rewritten root.
    ///
    /// Only the spine along the path is rewritten; sibling subtrees keep
    /// sharing their storage. A write that changes nothing returns this
    /// vector itself. A write that would replace the root with something
    /// other than a sequence (an empty path with a non-sequence value, or
    /// a first key that is not an index) is refused and returns this
    /// vector unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, PathKey, Value};
    ///
    /// let vector = FrozenVector::new(vec![Value::Array(vec![Value::from(1)])]);
    /// let path = [PathKey::from(0_usize), PathKey::from(0_usize)];
    ///
    /// let updated = vector.set_in(&path, Value::from(2));
    /// assert_eq!(updated.get_in(&path), Some(&Value::from(2)));
    ///
    /// let unchanged = vector.set_in(&path, Value::from(1));
    /// assert!(unchanged.ptr_eq(&vector));
    /// ```
    #[must_use]
    pub fn set_in(&self, path: &[PathKey], value: Value) -> Self {
        let mut root = Value::Array(self.to_vec());
        assign_at_path(&mut root, path, value);
        self.regate_root(root)
    }

    /// Shallow-merges `sources` into the slot at `path`, vivifying missing
    /// intermediates, and gates the rewritten root.
    ///
    /// Merging follows the slot's own shape: position-wise into sequences,
    /// key-wise into mappings. Sources that are not aggregates are
    /// skipped. A merge that changes nothing returns this vector itself.
    #[must_use]
    pub fn merge_in(&self, path: &[PathKey], sources: &[Value]) -> Self {
        let mut root = Value::Array(self.to_vec());
        merge_at_path(&mut root, path, sources);
        self.regate_root(root)
    }

    /// Gates the root produced by a deep write.
    ///
    /// Deep writes normally leave the root a raw sequence. An empty path
    /// can replace the root wholesale, and a mapping-kind first key
    /// vivifies the root into a mapping; a root that is no longer a
    /// sequence cannot become `Self`, so the replacement is refused.
    fn regate_root(&self, root: Value) -> Self {
        match root {
            Value::Array(slots) => self.gate(slots),
            Value::Vector(vector) => {
                if vector.hash_code == self.hash_code {
                    self.clone()
                } else {
                    vector
                }
            }
            _ => self.clone(),
        }
    }
}

// =============================================================================
// Conversion and Bulk Edit
// =============================================================================

impl FrozenVector {
    /// Clones the slots into a raw `Vec`, one layer deep.
    ///
    /// Nested frozen collections stay frozen and keep sharing their
    /// storage; this is the cheap candidate baseline every structural
    /// operation starts from.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.slots.as_ref().clone()
    }

    /// Thaws the vector into fully raw form, recursively.
    ///
    /// The escape hatch back to mutable data: the result contains no
    /// frozen collection anywhere.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector = FrozenVector::new(vec![Value::Array(vec![Value::from(1)])]);
    /// let raw = vector.thaw();
    /// assert_eq!(raw, vec![Value::Array(vec![Value::from(1)])]);
    /// ```
    #[must_use]
    pub fn thaw(&self) -> Vec<Value> {
        self.iter().map(Value::thaw).collect()
    }

    /// Hands a thawed copy of the slots to `mutator` and gates whatever it
    /// returns.
    ///
    /// The mutator receives fully raw slots plus a reference back to this
    /// vector, and may return a value of any shape. A result whose content
    /// equals this vector comes back as this vector itself (as a
    /// [`Value::Vector`]); anything else is frozen.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use floe::{FrozenVector, Value};
    ///
    /// let vector: FrozenVector = (1..=3).collect();
    ///
    /// let reversed = vector.mutate(|mut slots, _| {
    ///     slots.reverse();
    ///     Value::Array(slots)
    /// });
    /// assert_eq!(reversed, Value::Vector((1..=3).rev().collect()));
    ///
    /// let untouched = vector.mutate(|slots, _| Value::Array(slots));
    /// let Value::Vector(untouched) = untouched else { unreachable!() };
    /// assert!(untouched.ptr_eq(&vector));
    /// ```
    #[must_use]
    pub fn mutate<F>(&self, mutator: F) -> Value
    where
        F: FnOnce(Vec<Value>, &Self) -> Value,
    {
        let candidate = mutator(self.thaw(), self);
        self.gate_value(candidate)
    }
}

// =============================================================================
// Iterator Implementations
// =============================================================================

/// Double-ended, exact-size iterator over the slots of a [`FrozenVector`].
pub struct FrozenVectorIterator<'a> {
    slots: std::slice::Iter<'a, Value>,
}

impl<'a> Iterator for FrozenVectorIterator<'a> {
    type Item = &'a Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for FrozenVectorIterator<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots.next_back()
    }
}

impl ExactSizeIterator for FrozenVectorIterator<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Consuming iterator over the slots of a [`FrozenVector`].
///
/// Exclusively owned storage is drained in place; shared storage is cloned
/// first.
pub struct FrozenVectorIntoIterator {
    slots: std::vec::IntoIter<Value>,
}

impl FrozenVectorIntoIterator {
    fn new(vector: FrozenVector) -> Self {
        let slots = ReferenceCounter::try_unwrap(vector.slots)
            .unwrap_or_else(|shared| shared.as_ref().clone());
        Self {
            slots: slots.into_iter(),
        }
    }
}

impl Iterator for FrozenVectorIntoIterator {
    type Item = Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl DoubleEndedIterator for FrozenVectorIntoIterator {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.slots.next_back()
    }
}

impl ExactSizeIterator for FrozenVectorIntoIterator {
    #[inline]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl Default for FrozenVector {
    /// Returns an empty vector.
    #[inline]
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Value>> for FrozenVector {
    fn from(slots: Vec<Value>) -> Self {
        Self::new(slots)
    }
}

impl From<&[Value]> for FrozenVector {
    fn from(slots: &[Value]) -> Self {
        Self::new(slots.to_vec())
    }
}

impl<T: Into<Value>> FromIterator<T> for FrozenVector {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for FrozenVector {
    type Item = Value;
    type IntoIter = FrozenVectorIntoIterator;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        FrozenVectorIntoIterator::new(self)
    }
}

impl<'a> IntoIterator for &'a FrozenVector {
    type Item = &'a Value;
    type IntoIter = FrozenVectorIterator<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for FrozenVector {
    /// Equality is content-fingerprint equality; two vectors frozen from
    /// equal content compare equal even when they share no storage.
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code
    }
}

impl Eq for FrozenVector {}

impl Hash for FrozenVector {
    /// Feeds the stored fingerprint, keeping `Hash` consistent with the
    /// fingerprint-based `Eq`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code.as_u64());
    }
}

impl fmt::Debug for FrozenVector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FrozenVector")
            .field("hash_code", &self.hash_code)
            .field("slots", &self.slots)
            .finish()
    }
}

impl fmt::Display for FrozenVector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_sequence(formatter, self.iter())
    }
}

// =============================================================================
// Serde Implementations
// =============================================================================

#[cfg(feature = "serde")]
mod serde_support {
    use super::{FrozenVector, Value};

    use std::fmt;

    use serde::de::{SeqAccess, Visitor};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Upper bound on preallocation from untrusted size hints.
    const MAX_PREALLOCATE: usize = 4096;

    impl Serialize for FrozenVector {
        /// Serializes as a plain sequence; the fingerprint is derived
        /// state and never leaves the process.
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut sequence = serializer.serialize_seq(Some(self.len()))?;
            for slot in self.iter() {
                sequence.serialize_element(slot)?;
            }
            sequence.end()
        }
    }

    struct FrozenVectorVisitor;

    impl<'de> Visitor<'de> for FrozenVectorVisitor {
        type Value = FrozenVector;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a sequence of values")
        }

        fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
            let mut slots = Vec::with_capacity(capacity);
            while let Some(slot) = access.next_element::<Value>()? {
                slots.push(slot);
            }
            Ok(FrozenVector::new(slots))
        }
    }

    impl<'de> Deserialize<'de> for FrozenVector {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_seq(FrozenVectorVisitor)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
