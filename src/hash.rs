//! Content hashing for values.
//!
//! This module provides [`HashCode`], the content fingerprint stamped onto
//! every frozen collection at construction, and [`hash_value`], the function
//! that computes it. Equality of frozen collections and the no-op detection
//! performed by every structural operation are both defined purely in terms
//! of these fingerprints.
//!
//! # Hashing scheme
//!
//! - Every value is hashed under a shape tag ([`ValueKind`]), so a sequence
//!   can never collide with a mapping of the same entries by construction.
//! - Sequences hash their length followed by each slot fingerprint in
//!   order: position matters.
//! - Mappings hash their length and the *commutative sum* of per-entry
//!   contributions `f(k, v) = hash(k)·SEED₁ ⊕ hash(v)·SEED₂` using wrapping
//!   arithmetic: two mappings with the same entries hash identically
//!   regardless of insertion order. Two mixing seeds prevent degeneration
//!   when a value fingerprint is zero.
//! - A frozen collection contributes its stored fingerprint in O(1); only
//!   the raw surface of a candidate is ever walked. Parents always mix a
//!   child's fingerprint, never its representation, which is what makes a
//!   raw aggregate and the frozen collection built from it hash identically.
//!
//! Two values with equal fingerprints have equal content with overwhelming
//! probability (a 2⁻⁶⁴-class collision chance); the crate treats fingerprint
//! equality as content equality throughout.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::value::{Value, ValueKind};

/// First mixing seed (golden ratio constant).
const SEED_1: u64 = 0x9E37_79B9_7F4A_7C15;

/// Second mixing seed (large prime).
const SEED_2: u64 = 0x517C_C1B7_2722_0A95;

/// Canonical bit pattern for NaN; every NaN hashes the same.
const CANONICAL_NAN_BITS: u64 = 0x7FF8_0000_0000_0000;

// =============================================================================
// HashCode
// =============================================================================

/// A 64-bit content fingerprint.
///
/// Computed once per frozen collection, from the raw (pre-normalization)
/// input, and stored as hidden metadata: it is not a slot, it is never
/// iterated, and it never appears in a thawed structure.
///
/// # Examples
///
/// ```rust
/// use floe::{hash_value, Value};
///
/// let a = hash_value(&Value::from(vec![Value::from(1), Value::from(2)]));
/// let b = hash_value(&Value::from(vec![Value::from(1), Value::from(2)]));
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashCode(u64);

impl HashCode {
    /// Returns the raw 64-bit fingerprint.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for HashCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "HashCode({:#018x})", self.0)
    }
}

impl fmt::Display for HashCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:#018x}", self.0)
    }
}

// =============================================================================
// Hashing functions
// =============================================================================

/// Computes the 64-bit hash of a hashable value using the standard hasher.
#[must_use]
fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Computes the contribution of a single mapping entry.
///
/// `f(k, v) = key_hash · SEED₁ ⊕ value_hash · SEED₂`
#[must_use]
const fn entry_contribution(key_hash: u64, value_hash: u64) -> u64 {
    key_hash.wrapping_mul(SEED_1) ^ value_hash.wrapping_mul(SEED_2)
}

/// Returns the bit pattern a float hashes under.
///
/// Negative zero hashes as zero and every NaN hashes alike, matching the
/// equality semantics the crate documents for floats inside collections.
#[must_use]
fn canonical_float_bits(value: f64) -> u64 {
    if value.is_nan() {
        return CANONICAL_NAN_BITS;
    }
    let bits = value.to_bits();
    if bits == (-0.0_f64).to_bits() {
        0.0_f64.to_bits()
    } else {
        bits
    }
}

/// Computes the content fingerprint of any value.
///
/// Frozen collections return their stored fingerprint in O(1); raw
/// aggregates are walked recursively; primitives hash under their shape
/// tag. This is the single hashing entry point the collection constructors
/// call on their raw, not-yet-normalized input.
///
/// # Examples
///
/// ```rust
/// use floe::{hash_value, FrozenVector, Value};
///
/// let raw = vec![Value::from(1), Value::from(2)];
/// let frozen = FrozenVector::new(raw.clone());
///
/// // A raw array and the frozen collection built from it hash identically.
/// assert_eq!(hash_value(&Value::Array(raw)), frozen.hash_code());
/// ```
#[must_use]
pub fn hash_value(value: &Value) -> HashCode {
    match value {
        Value::Null => hash_primitive(ValueKind::Null, |_| {}),
        Value::Bool(boolean) => hash_primitive(ValueKind::Bool, |hasher| boolean.hash(hasher)),
        Value::Int(integer) => hash_primitive(ValueKind::Int, |hasher| integer.hash(hasher)),
        Value::Float(float) => hash_primitive(ValueKind::Float, |hasher| {
            hasher.write_u64(canonical_float_bits(*float));
        }),
        Value::String(string) => hash_primitive(ValueKind::String, |hasher| string.hash(hasher)),
        Value::Array(slots) => hash_sequence(slots),
        Value::Object(slots) => hash_mapping(slots),
        Value::Vector(vector) => vector.hash_code(),
        Value::Map(map) => map.hash_code(),
    }
}

/// Hashes a primitive under its shape tag.
fn hash_primitive(kind: ValueKind, write: impl FnOnce(&mut DefaultHasher)) -> HashCode {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    write(&mut hasher);
    HashCode(hasher.finish())
}

/// Computes the fingerprint of an ordered sequence of slots.
///
/// The length is hashed first, then each slot fingerprint in order, so
/// both element values and element positions matter.
#[must_use]
pub(crate) fn hash_sequence(slots: &[Value]) -> HashCode {
    let mut hasher = DefaultHasher::new();
    ValueKind::Sequence.hash(&mut hasher);
    hasher.write_usize(slots.len());
    for slot in slots {
        hasher.write_u64(hash_value(slot).as_u64());
    }
    HashCode(hasher.finish())
}

/// Computes the fingerprint of a string-keyed mapping.
///
/// Entry contributions are combined with a wrapping sum, so the result is
/// independent of insertion order.
#[must_use]
pub(crate) fn hash_mapping(slots: &IndexMap<String, Value>) -> HashCode {
    let mut sum: u64 = 0;
    for (key, value) in slots {
        sum = sum.wrapping_add(entry_contribution(
            hash_one(key.as_str()),
            hash_value(value).as_u64(),
        ));
    }
    let mut hasher = DefaultHasher::new();
    ValueKind::Mapping.hash(&mut hasher);
    hasher.write_usize(slots.len());
    hasher.write_u64(sum);
    HashCode(hasher.finish())
}

// =============================================================================
// Tests
// =============================================================================
