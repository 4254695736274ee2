//! Projection error types.
//!
//! Domain-specific errors raised while evaluating a projection against a
//! source record. All of these are fatal to the conversion that triggered
//! them: they indicate a schema mismatch between the record and the mapping,
//! not a recoverable condition.

use thiserror::Error;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while applying a [`Projection`](crate::Projection).
///
/// A `MissingField` during a provider-to-model conversion indicates API or
/// schema drift and must propagate to the caller; it is never recovered
/// locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// A required key was absent from the source record.
    #[error("Source record is missing required field: {field}")]
    MissingField { field: String },

    /// An element-wise transform was applied to a non-list value.
    #[error("Field '{field}' is expected to be a list but is not")]
    NotAnArray { field: String },

    /// A value had a shape the mapping cannot interpret.
    #[error("Field '{field}' has an unexpected shape: {reason}")]
    InvalidShape { field: String, reason: String },
}

/// Result type alias for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;
