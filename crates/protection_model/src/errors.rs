//! Model conversion error types.
//!
//! Umbrella error surfaced by the conversion entry points. Projection errors
//! indicate schema drift between a record and the declared field set;
//! resolver errors indicate that a human-readable reference could not be
//! translated to a provider-opaque identifier. Both are fatal to the
//! conversion that raised them: a write must never proceed with a partially
//! resolved payload.

use projection_engine::ProjectionError;
use thiserror::Error;

use crate::resolver::ResolverError;

/// Errors that can occur while converting a branch-protection rule between
/// representations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A projection against a source record failed.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// An identifier lookup failed.
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Result type alias for model conversions.
pub type ModelResult<T> = Result<T, ModelError>;
