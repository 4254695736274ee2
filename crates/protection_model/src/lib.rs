//! Declarative model, codecs, and validation for GitHub branch-protection
//! rules.
//!
//! This crate mediates between three shapes of the same logical entity:
//!
//! - the user-authored declarative model, where any field may be explicitly
//!   unset ([`BranchProtectionRule::from_model_data`]);
//! - the provider's live API representation, fully resolved with opaque
//!   internal identifiers ([`BranchProtectionRule::from_provider_data`]);
//! - the wire payload sent to the provider to create or update a rule
//!   ([`BranchProtectionRule::to_provider_data`]).
//!
//! Human-readable references (team and user names, app slugs, status-check
//! names) are translated to and from provider-opaque identifiers through the
//! [`IdentifierResolver`] trait; cross-field consistency between dependent
//! boolean/list field pairs is checked by [`BranchProtectionRule::validate`],
//! which accumulates findings instead of failing fast.
//!
//! The crate performs no I/O of its own: all network access happens behind
//! the resolver trait, and every conversion produces a fresh record rather
//! than mutating in place.

pub mod actors;
pub mod branch_protection_rule;
pub mod descriptor;
pub mod errors;
pub mod resolver;
pub mod status_check;
pub mod validation;
pub mod value;

pub use branch_protection_rule::BranchProtectionRule;
pub use descriptor::FieldDescriptor;
pub use errors::{ModelError, ModelResult};
pub use resolver::{IdentifierResolver, ResolverError};
pub use validation::{FindingSeverity, ValidationFinding, ValidationResult};
pub use value::FieldValue;
