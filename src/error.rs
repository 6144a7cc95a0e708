//! Error types for assignment requests.

use thiserror::Error;

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The capacity plan has no days.
    EmptyPlan,
    /// The plan length differs from the declared day count.
    PlanLengthMismatch,
    /// A point has a NaN or infinite coordinate.
    NonFiniteCoordinate,
    /// Two points share the same ID.
    DuplicateId,
    /// The strategy name is empty.
    EmptyStrategyName,
    /// A cost weight is negative or non-finite.
    InvalidWeight,
    /// A search or clustering parameter is out of range.
    InvalidParameter,
    /// A mapped column is not present in the table headers.
    MissingColumn,
    /// A table cell cannot be parsed.
    InvalidCell,
}

/// A rejected input, detected before any assignment work starts.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Errors returned by the assignment engine.
///
/// Capacity overflow is not an error: it shows up as unassigned points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignmentError {
    /// Malformed input.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    /// The strategy name is not registered.
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
    /// An exact strategy was asked to place a different number of points
    /// than the plan holds.
    #[error("exact assignment impossible: plan holds {planned} points but {points} were given")]
    InfeasibleExactAssignment {
        /// Sum of the plan.
        planned: usize,
        /// Number of points.
        points: usize,
    },
}

impl AssignmentError {
    /// Returns the validation error kind, if this is a validation error.
    pub fn validation_kind(&self) -> Option<ValidationErrorKind> {
        match self {
            AssignmentError::Validation(v) => Some(v.kind),
            _ => None,
        }
    }
}
