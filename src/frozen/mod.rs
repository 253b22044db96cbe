//! Frozen (immutable) collection values.
//!
//! This module provides the two frozen collection types of the crate:
//!
//! - [`FrozenVector`]: an immutable ordered sequence of [`Value`]s
//! - [`FrozenMap`]: an immutable string-keyed mapping of [`Value`]s
//!
//! Both freeze their contents recursively at construction, stamp the raw
//! input with a content fingerprint, and share storage through reference
//! counting. Every structural operation builds a raw candidate, hashes it,
//! and returns the original instance unchanged whenever the candidate
//! hashes identically, so a logical no-op never allocates a new value.
//!
//! # Examples
//!
//! ## `FrozenVector`
//!
//! ```rust
//! use floe::{FrozenVector, Value};
//!
//! let scores = FrozenVector::new(vec![Value::from(3), Value::from(1)]);
//! let extended = scores.push(Value::from(2));
//!
//! assert_eq!(scores.len(), 2);   // Original unchanged
//! assert_eq!(extended.len(), 3); // New vector
//!
//! // A change that changes nothing returns the same instance.
//! let same = extended.map(|slot| slot.clone());
//! assert!(same.ptr_eq(&extended));
//! ```
//!
//! ## `FrozenMap`
//!
//! ```rust
//! use floe::{FrozenMap, Value};
//!
//! let settings = FrozenMap::new(
//!     [("volume".to_string(), Value::from(10))].into_iter().collect(),
//! );
//! let updated = settings.set("volume", Value::from(60));
//!
//! assert_eq!(settings.get("volume"), Some(&Value::from(10))); // Original unchanged
//! assert_eq!(updated.get("volume"), Some(&Value::from(60)));  // New map
//!
//! // Overwriting an entry with the value it already holds is a no-op.
//! let same = updated.set("volume", Value::from(60));
//! assert!(same.ptr_eq(&updated));
//! ```
//!
//! [`Value`]: crate::Value

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod map;
mod vector;

pub use map::FrozenMap;
pub use map::FrozenMapIntoIterator;
pub use map::FrozenMapIterator;
pub use vector::FrozenVector;
pub use vector::FrozenVectorIntoIterator;
pub use vector::FrozenVectorIterator;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_clone() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(*reference_counter, *reference_counter_clone);
    }

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
