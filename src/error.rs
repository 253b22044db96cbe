//! Error types for fallible collection operations.
//!
//! Most operations in this crate are total: reads return [`Option`],
//! transformations clamp or skip out-of-shape input, and merges ignore
//! sources of the wrong shape. The two conditions that remain genuinely
//! fallible are described by [`FloeError`].

use std::error::Error;
use std::fmt;

use crate::value::ValueKind;

/// Error raised by fallible collection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloeError {
    /// A value could not be interpreted as a path key.
    ///
    /// Path keys are integer indexes or string keys; converting any other
    /// shape of value into a [`PathKey`](crate::PathKey) fails with the
    /// offending shape.
    InvalidPath {
        /// Shape of the rejected value.
        kind: ValueKind,
    },
    /// A write index pointed past the end of a vector.
    ///
    /// Writing at `index == length` appends; anything beyond that is
    /// rejected rather than silently growing the vector.
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Length of the vector at the time of the write.
        length: usize,
    },
}

impl fmt::Display for FloeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath { kind } => write!(
                formatter,
                "invalid path key: expected an integer index or a string key, found {kind}"
            ),
            Self::IndexOutOfRange { index, length } => write!(
                formatter,
                "index {index} out of range for vector of length {length}"
            ),
        }
    }
}

impl Error for FloeError {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_invalid_path_display() {
        let error = FloeError::InvalidPath {
            kind: ValueKind::Bool,
        };
        assert_eq!(
            error.to_string(),
            "invalid path key: expected an integer index or a string key, found bool"
        );
    }

    #[rstest]
    fn test_index_out_of_range_display() {
        let error = FloeError::IndexOutOfRange {
            index: 5,
            length: 3,
        };
        assert_eq!(
            error.to_string(),
            "index 5 out of range for vector of length 3"
        );
    }

    #[rstest]
    fn test_error_is_std_error() {
        fn assert_error<E: Error>(_: &E) {}
        assert_error(&FloeError::IndexOutOfRange {
            index: 0,
            length: 0,
        });
    }
}
