//! Error types for lanely operations.
//!
//! Every fallible operation returns [`Result`]. Errors are synchronous and local to the
//! call that raised them: inputs are immutable and stores validate every lane before
//! writing, so an error never leaves partially written output behind.

use std::fmt;

use crate::simd::ElementKind;

/// Errors that can occur during lanely operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorError {
    /// The requested species or shape cannot be represented.
    ConfigurationError {
        /// Element kind of the rejected species.
        kind: ElementKind,
        /// Requested lane count.
        lanes: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Integer division by zero in a participating lane.
    ArithmeticError {
        /// Human-readable error message.
        message: String,
    },
    /// The operation is not supported by the element kind.
    CapabilityError {
        /// Element kind the operation was invoked on.
        kind: ElementKind,
        /// Name of the rejected operation.
        operation: String,
    },
    /// Two operands were built from different species.
    SpeciesMismatch {
        /// Species of the receiver.
        expected: String,
        /// Species of the offending operand.
        actual: String,
    },
    /// An array offset, lane index, slice origin or part number is out of range.
    IndexOutOfBounds {
        /// The offending index.
        index: i64,
        /// The exclusive upper bound the index was checked against.
        length: usize,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::ConfigurationError {
                kind,
                lanes,
                message,
            } => write!(
                f,
                "Unsupported species: {} (element {} with {} lanes)",
                message, kind, lanes
            ),
            VectorError::ArithmeticError { message } => {
                write!(f, "Arithmetic error: {}", message)
            }
            VectorError::CapabilityError { kind, operation } => write!(
                f,
                "Unsupported operation: {} is not available for {} lanes",
                operation, kind
            ),
            VectorError::SpeciesMismatch { expected, actual } => {
                write!(f, "Species mismatch: expected {}, found {}", expected, actual)
            }
            VectorError::IndexOutOfBounds {
                index,
                length,
                message,
            } => write!(
                f,
                "Index out of bounds: {} (index: {}, length: {})",
                message, index, length
            ),
        }
    }
}

impl std::error::Error for VectorError {}

/// Result type alias for lanely operations.
pub type Result<T> = std::result::Result<T, VectorError>;

/// Creates a configuration error.
pub fn configuration_error(
    kind: ElementKind,
    lanes: usize,
    message: impl Into<String>,
) -> VectorError {
    VectorError::ConfigurationError {
        kind,
        lanes,
        message: message.into(),
    }
}

/// Creates an arithmetic error.
pub fn arithmetic_error(message: impl Into<String>) -> VectorError {
    VectorError::ArithmeticError {
        message: message.into(),
    }
}

/// Creates a capability error.
pub fn capability_error(kind: ElementKind, operation: impl Into<String>) -> VectorError {
    VectorError::CapabilityError {
        kind,
        operation: operation.into(),
    }
}

/// Creates a species mismatch error.
pub fn species_mismatch(expected: impl fmt::Display, actual: impl fmt::Display) -> VectorError {
    VectorError::SpeciesMismatch {
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

/// Creates an index error.
pub fn index_error(index: i64, length: usize, message: impl Into<String>) -> VectorError {
    VectorError::IndexOutOfBounds {
        index,
        length,
        message: message.into(),
    }
}
