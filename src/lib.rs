//! # floe
//!
//! Immutable collection values with structural sharing and built-in change
//! detection.
//!
//! ## Overview
//!
//! This library provides collection values that never change in place:
//! every edit returns a new handle and the original stays valid. It
//! includes:
//!
//! - **Frozen collections**: [`FrozenVector`] (ordered, index-addressed)
//!   and [`FrozenMap`] (string-keyed, insertion-ordered)
//! - **Change detection**: every edit is content-fingerprinted, and an
//!   edit that changes nothing returns the original instance instead of
//!   an equal copy
//! - **Structural sharing**: handles share their backing storage through
//!   reference counting, and a deep write rewrites only the spine of the
//!   addressed path
//! - **Deep paths**: `get_in`, `set_in` and `merge_in` address slots
//!   through arbitrarily nested collections, creating missing
//!   intermediates on the way
//! - **Freeze / thaw**: raw [`Value::Array`] and [`Value::Object`]
//!   aggregates freeze recursively into collections; `thaw` converts back
//!   for bulk edits
//! - **Literal macros**: [`frozen_vector!`], [`frozen_map!`] and [`path!`]
//!
//! ## Feature Flags
//!
//! - `arc`: store collection slots behind `Arc` instead of `Rc`, making
//!   the collection types `Send` and `Sync`
//! - `serde`: `Serialize` and `Deserialize` for values and collections
//!
//! ## Example
//!
//! ```rust
//! use floe::{frozen_map, path, Value};
//!
//! let settings = frozen_map! {
//!     "volume" => 10,
//!     "theme" => frozen_map! { "mode" => "dark" },
//! };
//!
//! // Edits return new handles; the original never changes.
//! let louder = settings.set("volume", Value::from(60));
//! assert_eq!(louder.get("volume"), Some(&Value::from(60)));
//! assert_eq!(settings.get("volume"), Some(&Value::from(10)));
//!
//! // An edit that changes nothing returns the original instance.
//! let same = settings.set_in(&path!["theme", "mode"], Value::from("dark"));
//! assert!(same.ptr_eq(&settings));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and functions.
///
/// # Usage
///
/// ```rust
/// use floe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::FloeError;
    pub use crate::frozen::{FrozenMap, FrozenVector};
    pub use crate::hash::{hash_value, HashCode};
    pub use crate::path::{resolve_path, Path, PathKey};
    pub use crate::value::{freeze, Value, ValueKind};
}

pub mod error;
pub mod frozen;
pub mod hash;
pub mod path;
pub mod value;

mod value_macro;

pub use crate::error::FloeError;
pub use crate::frozen::{
    FrozenMap, FrozenMapIntoIterator, FrozenMapIterator, FrozenVector,
    FrozenVectorIntoIterator, FrozenVectorIterator,
};
pub use crate::hash::{hash_value, HashCode};
pub use crate::path::{resolve_path, Path, PathKey};
pub use crate::value::{freeze, Value, ValueKind};
