use thiserror::Error;

/// Errors returned by rope operations. A failed operation never changes the rope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RopeError {
    /// The offset or span lies outside the rope
    #[error("range {start}..{end} is out of bounds for a rope of length {len}")]
    OutOfRange {
        start: usize,
        end: usize,
        len: usize,
    },

    /// An argument is malformed regardless of the rope's contents
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
