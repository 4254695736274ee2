//! Identifier resolver interface and types.
//!
//! This module defines the abstract interface for translating human-readable
//! references (team and user names, app slugs) into the provider's opaque
//! internal identifiers. The model core treats the resolver as an opaque
//! call that may block on network I/O and may fail; caching, retry, and
//! timeout behavior all belong to implementations, not to this interface.
//!
//! Both operations are batched on purpose: a conversion collects every
//! reference it needs for a field, issues one call, and re-walks its data
//! with the result, keeping provider round trips to one per field.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during identifier resolution.
///
/// Unknown references are fatal to the conversion that requested them: a
/// wire payload must never be written with a partially resolved identifier
/// list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// An actor reference (team or user) could not be resolved.
    #[error("Unknown actor reference: {reference}")]
    UnknownActor { reference: String },

    /// An app slug could not be resolved.
    #[error("Unknown app slug: {slug}")]
    UnknownApp { slug: String },

    /// The lookup itself failed (network, authentication, provider outage).
    #[error("Identifier lookup failed: {reason}")]
    Transport { reason: String },
}

/// Resolves human-readable references to provider-opaque identifiers.
///
/// Implementations are expected to be safe for concurrent use; independent
/// fields' resolutions carry no ordering dependency on each other.
#[async_trait]
pub trait IdentifierResolver: Send + Sync {
    /// Resolve a list of actor references to opaque actor identifiers,
    /// preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::UnknownActor`] if any reference cannot be
    /// resolved; the result is all-or-nothing.
    async fn resolve_actor_ids(&self, references: &[String]) -> Result<Vec<String>, ResolverError>;

    /// Resolve a set of app slugs to a slug-to-identifier mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::UnknownApp`] if any slug cannot be resolved;
    /// the result is all-or-nothing.
    async fn resolve_app_ids(
        &self,
        slugs: &BTreeSet<String>,
    ) -> Result<HashMap<String, String>, ResolverError>;
}
