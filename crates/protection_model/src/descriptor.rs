//! Static field-descriptor table for the branch-protection rule entity.
//!
//! Field names are the provider's camelCase JSON keys, shared by user
//! configuration, model records, and wire payloads. The table is an explicit
//! static declaration (checked by unit tests) rather than runtime
//! introspection over the entity type.

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;

/// Metadata for a single declared field of the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// JSON key of the field, as used in records and payloads.
    pub name: &'static str,
    /// Whether this field forms the entity's key within its parent scope.
    pub key: bool,
    /// Whether this field exists only in live provider state and is never
    /// written back.
    pub external_only: bool,
}

const fn plain(name: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        key: false,
        external_only: false,
    }
}

/// All declared fields, in model order.
pub const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor {
        name: "id",
        key: false,
        external_only: true,
    },
    FieldDescriptor {
        name: "pattern",
        key: true,
        external_only: false,
    },
    plain("allowsDeletions"),
    plain("allowsForcePushes"),
    plain("dismissesStaleReviews"),
    plain("isAdminEnforced"),
    plain("lockAllowsFetchAndMerge"),
    plain("lockBranch"),
    plain("bypassForcePushAllowances"),
    plain("bypassPullRequestAllowances"),
    plain("pushRestrictions"),
    plain("requireLastPushApproval"),
    plain("requiredApprovingReviewCount"),
    plain("requiresApprovingReviews"),
    plain("requiresCodeOwnerReviews"),
    plain("requiresCommitSignatures"),
    plain("requiresConversationResolution"),
    plain("requiresLinearHistory"),
    plain("requiresStatusChecks"),
    plain("requiresStrictStatusChecks"),
    plain("restrictsReviewDismissals"),
    plain("reviewDismissalAllowances"),
    plain("requiredStatusChecks"),
];

/// Iterate over every declared field.
pub fn all_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    FIELDS.iter()
}

/// Iterate over the fields eligible for provider writes (external-only
/// fields excluded).
pub fn provider_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    FIELDS.iter().filter(|field| !field.external_only)
}

/// The key-forming field of the entity.
pub fn key_field() -> &'static FieldDescriptor {
    // The table declares exactly one key field; the unit tests pin that down.
    FIELDS
        .iter()
        .find(|field| field.key)
        .unwrap_or(&FIELDS[0])
}
