//! Error types shared by the containers.

use thiserror::Error;

/// Failure of a configuration or positional operation.
///
/// Lookups never produce an `Error`; absence is reported as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A constructor or builder received an argument it cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A positional list operation addressed an index past the end.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
