//! Literal constructor macros for frozen collections and paths.
//!
//! This module provides [`frozen_vector!`], [`frozen_map!`] and [`path!`],
//! which build the crate's core types from literal syntax the way `vec!`
//! builds a `Vec`.

/// Builds a [`FrozenVector`](crate::FrozenVector) from listed elements.
///
/// Every element goes through [`Value::from`](crate::Value::from), so any
/// type with a `Value` conversion can appear directly, raw aggregates
/// included (they freeze on the way in).
///
/// # Syntax
///
/// - `frozen_vector![]` - An empty vector
/// - `frozen_vector![a, b, c]` - A vector of the listed elements
/// - `frozen_vector![element; count]` - `count` copies of `element`
///
/// # Examples
///
/// ## Listed elements
///
/// ```rust
/// use floe::{frozen_vector, Value};
///
/// let numbers = frozen_vector![1, 2, 3];
/// assert_eq!(numbers.len(), 3);
/// assert_eq!(numbers.get(0), Some(&Value::from(1)));
/// ```
///
/// ## Mixed and nested elements
///
/// ```rust
/// use floe::{frozen_vector, Value};
///
/// let mixed = frozen_vector![frozen_vector![1, 2], "text", 2.5, Value::Null];
/// assert!(matches!(mixed.get(0), Some(Value::Vector(_))));
/// assert_eq!(mixed.get(3), Some(&Value::Null));
/// ```
///
/// ## Repeat form
///
/// ```rust
/// use floe::{frozen_vector, Value};
///
/// let zeroes = frozen_vector![0; 4];
/// assert_eq!(zeroes.len(), 4);
/// assert_eq!(zeroes.get(3), Some(&Value::from(0)));
/// ```
#[macro_export]
macro_rules! frozen_vector {
    // Empty vector
    () => {
        $crate::FrozenVector::default()
    };

    // Repeat form, like `vec![element; count]`
    ($element:expr; $count:expr) => {
        $crate::FrozenVector::new(::std::vec![$crate::Value::from($element); $count])
    };

    // Listed elements
    ($($element:expr),+ $(,)?) => {
        $crate::FrozenVector::new(::std::vec![$($crate::Value::from($element)),+])
    };
}

/// Builds a [`FrozenMap`](crate::FrozenMap) from `key => value` entries.
///
/// Keys convert into `String` and values through
/// [`Value::from`](crate::Value::from). Entries keep the written order; a
/// repeated key keeps its first position and takes the last value, the
/// same way [`set`](crate::FrozenMap::set) treats an existing key.
///
/// # Syntax
///
/// - `frozen_map! {}` - An empty map
/// - `frozen_map! { "key" => value, ... }` - A map of the listed entries
///
/// # Examples
///
/// ## Listed entries
///
/// ```rust
/// use floe::{frozen_map, Value};
///
/// let settings = frozen_map! {
///     "volume" => 10,
///     "mode" => "dark",
/// };
/// assert_eq!(settings.get("volume"), Some(&Value::from(10)));
/// assert_eq!(settings.keys().collect::<Vec<_>>(), vec!["volume", "mode"]);
/// ```
///
/// ## Nested aggregates freeze on the way in
///
/// ```rust
/// use floe::{frozen_map, frozen_vector, Value};
///
/// let profile = frozen_map! {
///     "name" => "floe",
///     "emails" => frozen_vector!["a@example.com"],
///     "tags" => vec![Value::from("rust")],
/// };
/// assert!(matches!(profile.get("tags"), Some(Value::Vector(_))));
/// ```
#[macro_export]
macro_rules! frozen_map {
    // Empty map
    () => {
        $crate::FrozenMap::default()
    };

    // Listed entries
    ($($key:expr => $value:expr),+ $(,)?) => {
        <$crate::FrozenMap as ::std::iter::FromIterator<_>>::from_iter([
            $(($key, $crate::Value::from($value))),+
        ])
    };
}

/// Builds a [`Path`](crate::Path) from listed keys.
///
/// String keys select mapping entries and `usize` keys select sequence
/// positions; both kinds mix freely in one path.
///
/// # Syntax
///
/// - `path![]` - The empty path, which addresses the root
/// - `path![key, ...]` - A path of the listed keys
///
/// # Examples
///
/// ```rust
/// use floe::{frozen_map, frozen_vector, path, Value};
///
/// let profile = frozen_map! {
///     "emails" => frozen_vector!["a@example.com", "b@example.com"],
/// };
///
/// let second = path!["emails", 1];
/// assert_eq!(second.to_string(), "emails.1");
/// assert_eq!(
///     profile.get_in(&second),
///     Some(&Value::from("b@example.com")),
/// );
/// ```
#[macro_export]
macro_rules! path {
    // Empty path
    () => {
        $crate::Path::new()
    };

    // Listed keys
    ($($key:expr),+ $(,)?) => {{
        let mut path = $crate::Path::new();
        $(path.push($key);)+
        path
    }};
}
