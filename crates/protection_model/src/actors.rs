//! Codec for actor-reference list fields.
//!
//! The declarative model stores push restrictions and the three bypass /
//! dismissal allowance fields as lists of human-readable actor references.
//! The provider expects lists of opaque actor identifiers under different
//! field names, and for push restrictions additionally a separate boolean
//! toggle: the wire protocol represents "restriction active" decoupled from
//! the allowance list, while the model conflates them (empty list means
//! inactive).
//!
//! One static table drives all four fields; each conversion issues at most
//! one batched resolver call per field.

use serde_json::{json, Value};
use tracing::debug;

use projection_engine::Projection;

use crate::branch_protection_rule::BranchProtectionRule;
use crate::errors::ModelResult;
use crate::resolver::IdentifierResolver;
use crate::value::FieldValue;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "actors_tests.rs"]
mod tests;

/// Provider field name of the derived push-restriction toggle.
pub const RESTRICTS_PUSHES: &str = "restrictsPushes";

/// One actor-reference list field and its provider-side counterpart.
pub struct ActorListField {
    /// Model field name holding human-readable references.
    pub source: &'static str,
    /// Provider field name receiving the resolved identifiers.
    pub target: &'static str,
    /// Whether this field derives the companion `restrictsPushes` toggle.
    pub derives_restriction_flag: bool,
    /// Accessor for the field's value on the entity.
    pub get: fn(&BranchProtectionRule) -> &FieldValue<Vec<String>>,
}

/// The four actor-reference list fields of a branch-protection rule.
pub const ACTOR_LIST_FIELDS: &[ActorListField] = &[
    ActorListField {
        source: "pushRestrictions",
        target: "pushActorIds",
        derives_restriction_flag: true,
        get: |rule| &rule.push_restrictions,
    },
    ActorListField {
        source: "reviewDismissalAllowances",
        target: "reviewDismissalActorIds",
        derives_restriction_flag: false,
        get: |rule| &rule.review_dismissal_allowances,
    },
    ActorListField {
        source: "bypassPullRequestAllowances",
        target: "bypassPullRequestActorIds",
        derives_restriction_flag: false,
        get: |rule| &rule.bypass_pull_request_allowances,
    },
    ActorListField {
        source: "bypassForcePushAllowances",
        target: "bypassForcePushActorIds",
        derives_restriction_flag: false,
        get: |rule| &rule.bypass_force_push_allowances,
    },
];

/// Rewrite one actor-reference field of an outgoing mapping.
///
/// Pops the human-readable source field, and when it is set and valid,
/// injects the batch-resolved identifier list under the provider's field
/// name. Unset fields leave the mapping untouched (no change requested for
/// that aspect of the rule); invalid fields are popped without a
/// replacement, since lower-level field validation reports them separately.
///
/// No resolver call is made for an empty list; the derived toggle, when this
/// field carries one, is still injected as `false`.
///
/// # Errors
///
/// Returns [`ResolverError::UnknownActor`](crate::ResolverError::UnknownActor)
/// (wrapped in [`ModelError`](crate::ModelError)) when a reference cannot be
/// resolved.
pub async fn resolve_actor_field(
    mapping: &mut Projection,
    field: &ActorListField,
    value: &FieldValue<Vec<String>>,
    resolver: &dyn IdentifierResolver,
) -> ModelResult<()> {
    if value.is_unset() {
        return Ok(());
    }

    mapping.remove(field.source);

    let Some(references) = value.valid() else {
        return Ok(());
    };

    let actor_ids = if references.is_empty() {
        Vec::new()
    } else {
        debug!(
            field = field.source,
            reference_count = references.len(),
            "Resolving actor references"
        );
        resolver.resolve_actor_ids(references).await?
    };

    mapping.constant(field.target, json!(actor_ids));
    if field.derives_restriction_flag {
        mapping.constant(RESTRICTS_PUSHES, Value::Bool(!actor_ids.is_empty()));
    }

    Ok(())
}
