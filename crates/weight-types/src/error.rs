//! Error types for weight algebra and weight I/O.

use std::io;

use thiserror::Error;

use crate::traits::DivideType;

/// Algebraic contract violations.
///
/// These signal a programming error at the call site. The fallible entry
/// points (`try_divide`, `try_convert`, ...) return them; the plain entry
/// points panic with their message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightError {
    /// Division by the semiring zero.
    #[error("division by zero in the {0} semiring")]
    DivideByZero(String),

    /// The operands admit no quotient.
    #[error("{kind}: no quotient exists for {lhs} / {rhs}")]
    NoQuotient {
        kind: String,
        lhs: String,
        rhs: String,
    },

    /// The requested division side is not defined for this kind.
    #[error("{kind}: {divide:?} division is not defined")]
    UnsupportedDivide { kind: String, divide: DivideType },

    /// A restricted kind was combined with non-identical operands.
    #[error("{kind}: restricted operands differ ({lhs} vs {rhs})")]
    RestrictMismatch {
        kind: String,
        lhs: String,
        rhs: String,
    },

    /// A value cannot be represented in the target kind.
    #[error("{value} is not representable as {kind}")]
    NotRepresentable { kind: String, value: String },

    /// Fixed-arity access or construction out of range.
    #[error("{kind}: index {index} out of range for arity {arity}")]
    IndexOutOfRange {
        kind: String,
        index: usize,
        arity: usize,
    },

    /// A fixed-arity composite was built from the wrong number of components.
    #[error("{kind}: expected {expected} components, found {found}")]
    ArityMismatch {
        kind: String,
        expected: usize,
        found: usize,
    },

    /// Lexicographic components must be idempotent with a total natural order.
    #[error("{0} requires path-ordered component semirings")]
    NotPathOrdered(String),
}

/// Failures while reading a weight from text or binary input.
///
/// These are recoverable: callers either propagate them or substitute the
/// kind's no-weight sentinel.
#[derive(Debug, Error)]
pub enum ParseWeightError {
    /// Input ended in the middle of a weight.
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEnd(usize),

    /// A structural character was expected.
    #[error("expected `{expected}` at offset {offset}")]
    Expected { expected: char, offset: usize },

    /// A token could not be interpreted.
    #[error("invalid {kind} token `{token}`")]
    InvalidToken { kind: String, token: String },

    /// Text remained after a complete weight.
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),

    /// Binary input was well-sized but not a valid encoding.
    #[error("invalid binary {kind} encoding: {reason}")]
    InvalidBinary { kind: String, reason: String },

    /// Binary input was truncated or unreadable.
    #[error("binary read failed: {0}")]
    Io(#[from] io::Error),
}

/// Result type for weight operations.
pub type Result<T> = std::result::Result<T, WeightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WeightError::DivideByZero("tropical".to_string());
        assert_eq!(err.to_string(), "division by zero in the tropical semiring");

        let err = WeightError::IndexOutOfRange {
            kind: "tropical_^3".to_string(),
            index: 5,
            arity: 3,
        };
        assert!(err.to_string().contains("index 5"));
    }

    #[test]
    fn test_io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err: ParseWeightError = io_err.into();
        assert!(matches!(err, ParseWeightError::Io(_)));
    }
}
