//! Parameter validation errors
//!
//! [`InputError`] covers every way a parameter set can be rejected before an
//! algorithm runs. These never escape [`record`](super::record): they are
//! turned into a single `Status::Error` snapshot whose narration is the
//! error's `Display` text.

/// Invalid parameters for an algorithm
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A required sequence or string was empty
    #[error("{what} must not be empty")]
    Empty { what: &'static str },

    /// A sequence is longer than the visualisation supports
    #[error("{what} has {len} entries, at most {max} are supported")]
    TooLarge {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// A scalar parameter lies outside the supported range
    #[error("{what} must be between {min} and {max}, got {value}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The pattern cannot fit inside the text
    #[error("pattern of length {pattern} is longer than text of length {text}")]
    PatternLongerThanText { pattern: usize, text: usize },

    /// Binary search needs ascending input
    #[error("binary search needs the array sorted in ascending order (index {index} breaks the order)")]
    Unsorted { index: usize },

    /// A graph edge or endpoint names a node that does not exist
    #[error("node {node} does not exist in a graph of {nodes} nodes")]
    NodeOutOfRange { node: usize, nodes: usize },

    /// Parallel sequences of different lengths
    #[error("{what}: {left} weights but {right} values")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    /// gcd(0, 0) is undefined
    #[error("gcd is undefined when both operands are zero")]
    BothZero,

    /// A point coordinate is NaN or infinite
    #[error("point {index} has a coordinate that is not a finite number")]
    NonFinite { index: usize },

    /// Sudoku clues contradict each other
    #[error("the puzzle is inconsistent: {reason}")]
    InvalidPuzzle { reason: String },

    /// The parameter set belongs to another algorithm
    #[error("{algorithm} expects {expected} parameters")]
    ParamsMismatch {
        algorithm: &'static str,
        expected: &'static str,
    },
}

/// Check that `len` lies in `1..=max`
pub(crate) fn check_len(what: &'static str, len: usize, max: usize) -> Result<(), InputError> {
    if len == 0 {
        return Err(InputError::Empty { what });
    }
    if len > max {
        return Err(InputError::TooLarge { what, len, max });
    }
    Ok(())
}

/// Check that `value` lies in `min..=max`
pub(crate) fn check_range(
    what: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), InputError> {
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(())
}
