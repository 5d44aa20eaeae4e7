//! Error types for descriptor construction and value conversion.
//!
//! Validation itself never fails: `satisfies` always answers with a boolean.
//! Errors only arise when a descriptor is assembled from malformed operands,
//! or when a runtime value is converted to a representation that cannot
//! hold it.

use thiserror::Error;

use crate::value::NativeKind;

/// Result alias defaulting to [`DescriptorError`].
pub type Result<T, E = DescriptorError> = std::result::Result<T, E>;

/// Construction-time failure of a composite descriptor or namespace call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DescriptorError {
    /// Union/Intersection called with nothing to fold.
    #[error("{builder} requires at least one operand")]
    EmptyOperands { builder: &'static str },

    /// A builder with a fixed signature received the wrong number of operands.
    #[error("{builder} expects {expected} operand(s), got {actual}")]
    OperandCount {
        builder: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The parameter list handed to `Function` has no arity.
    #[error("Function parameters must be an arguments tuple, got `{found}`")]
    NotArguments { found: String },

    /// A structured object lists the same field twice.
    #[error("field `{name}` is declared more than once")]
    DuplicateField { name: String },

    /// The namespace has no entry under this name.
    #[error("no builder named `{0}`")]
    UnknownBuilder(String),

    /// An operand of the wrong sort was passed to a namespace builder.
    #[error("{builder} argument {position} must be {expected}, got {found}")]
    InvalidArgument {
        builder: &'static str,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
}

impl DescriptorError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyOperands { .. } => "EMPTY_OPERANDS",
            Self::OperandCount { .. } => "OPERAND_COUNT",
            Self::NotArguments { .. } => "NOT_ARGUMENTS",
            Self::DuplicateField { .. } => "DUPLICATE_FIELD",
            Self::UnknownBuilder(_) => "UNKNOWN_BUILDER",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
        }
    }
}

/// Failure converting a [`Value`](crate::Value) to another representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    #[error("{kind} values have no JSON representation")]
    NotRepresentable { kind: NativeKind },
}
