//! The branch-protection rule entity and its conversions.
//!
//! A rule is identified by `pattern` (the branch-name glob it applies to)
//! within the scope of a parent repository. Every field is a three-state
//! [`FieldValue`]: user configuration may legitimately leave any field
//! unspecified, while live provider state is always fully populated.
//!
//! Instances are immutable once constructed; the conversions always produce
//! a fresh record rather than mutating in place.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use projection_engine::{ProjectedRecord, Projection, SourceRecord};

use crate::actors::{self, ACTOR_LIST_FIELDS};
use crate::descriptor;
use crate::errors::ModelResult;
use crate::resolver::IdentifierResolver;
use crate::status_check;
use crate::validation::ValidationResult;
use crate::value::FieldValue;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "branch_protection_rule_tests.rs"]
mod tests;

/// Name of this entity in diagnostics.
pub const MODEL_OBJECT_NAME: &str = "branch_protection_rule";

/// A branch-protection rule in its declarative representation.
///
/// Field names follow the provider's camelCase JSON keys (see
/// [`descriptor::FIELDS`]); the `id` field exists only in live provider
/// state and is never written back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchProtectionRule {
    pub id: FieldValue<String>,
    pub pattern: FieldValue<String>,
    pub allows_deletions: FieldValue<bool>,
    pub allows_force_pushes: FieldValue<bool>,
    pub dismisses_stale_reviews: FieldValue<bool>,
    pub is_admin_enforced: FieldValue<bool>,
    pub lock_allows_fetch_and_merge: FieldValue<bool>,
    pub lock_branch: FieldValue<bool>,
    pub bypass_force_push_allowances: FieldValue<Vec<String>>,
    pub bypass_pull_request_allowances: FieldValue<Vec<String>>,
    pub push_restrictions: FieldValue<Vec<String>>,
    pub require_last_push_approval: FieldValue<bool>,
    pub required_approving_review_count: FieldValue<i64>,
    pub requires_approving_reviews: FieldValue<bool>,
    pub requires_code_owner_reviews: FieldValue<bool>,
    pub requires_commit_signatures: FieldValue<bool>,
    pub requires_conversation_resolution: FieldValue<bool>,
    pub requires_linear_history: FieldValue<bool>,
    pub requires_status_checks: FieldValue<bool>,
    pub requires_strict_status_checks: FieldValue<bool>,
    pub restricts_review_dismissals: FieldValue<bool>,
    pub review_dismissal_allowances: FieldValue<Vec<String>>,
    pub required_status_checks: FieldValue<Vec<String>>,
}

fn field<T: DeserializeOwned>(record: &ProjectedRecord, name: &str) -> FieldValue<T> {
    match record.get(name) {
        Some(slot) => FieldValue::from_slot(slot),
        None => FieldValue::Unset,
    }
}

impl BranchProtectionRule {
    /// Build a rule from raw user configuration.
    ///
    /// Permissive: any declared field may be absent and resolves to the
    /// explicit unset state, never to a default value or an error.
    pub fn from_model_data(data: &SourceRecord) -> Self {
        let mut mapping = Projection::new();
        for descriptor in descriptor::all_fields() {
            mapping.optional_unset(descriptor.name);
        }
        // A projection built purely from optional rules cannot fail.
        let record = mapping.apply(data).unwrap_or_default();
        Self::from_record(&record)
    }

    /// Build a rule from a provider API response.
    ///
    /// Every declared field is expected to be present; `requiredStatusChecks`
    /// is decoded element-wise from the provider's structured shape into
    /// compact tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::MissingField`](projection_engine::ProjectionError::MissingField)
    /// when a field is absent, which indicates provider schema drift and is
    /// fatal to the conversion.
    #[instrument(skip(data))]
    pub fn from_provider_data(data: &SourceRecord) -> ModelResult<Self> {
        let mut mapping = Projection::new();
        for descriptor in descriptor::all_fields() {
            if descriptor.name == "requiredStatusChecks" {
                mapping.map_elements(descriptor.name, Box::new(status_check::decode));
            } else {
                mapping.required(descriptor.name);
            }
        }
        let record = mapping.apply(data)?;
        Ok(Self::from_record(&record))
    }

    /// Produce the wire payload for creating or updating this rule.
    ///
    /// Only provider-write-eligible fields that are set appear in the
    /// payload; unset fields are omitted entirely (no `null` keys). Actor
    /// reference lists are replaced by batch-resolved identifier lists under
    /// the provider's field names, `pushRestrictions` additionally derives
    /// the `restrictsPushes` toggle, and status-check tokens are encoded
    /// into the provider's structured shape.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`](crate::ModelError) when the resolver cannot
    /// translate a reference; the write must not proceed with a partially
    /// resolved payload.
    #[instrument(skip(self, resolver), fields(pattern = %self.pattern_for_display()))]
    pub async fn to_provider_data(
        &self,
        resolver: &dyn IdentifierResolver,
    ) -> ModelResult<SourceRecord> {
        let source = self.to_model_data();

        let mut mapping = Projection::new();
        for descriptor in descriptor::provider_fields() {
            if source.contains_key(descriptor.name) {
                mapping.required(descriptor.name);
            }
        }

        for actor_field in ACTOR_LIST_FIELDS {
            let value = (actor_field.get)(self);
            actors::resolve_actor_field(&mut mapping, actor_field, value, resolver).await?;
        }

        if mapping.contains("requiredStatusChecks") {
            mapping.remove("requiredStatusChecks");
            if let Some(tokens) = self.required_status_checks.valid() {
                let encoded = status_check::encode(tokens, resolver).await?;
                mapping.constant("requiredStatusChecks", Value::Array(encoded));
            }
        }

        let record = mapping.apply(&source)?;
        let payload = record.into_json_map();
        debug!(
            field_count = payload.len(),
            "Mapped branch protection rule to provider payload"
        );
        Ok(payload)
    }

    /// The model record of this rule: every set field under its JSON key.
    ///
    /// Unset fields are omitted; invalid fields echo their raw value.
    pub fn to_model_data(&self) -> SourceRecord {
        let mut record = SourceRecord::new();
        for descriptor in descriptor::all_fields() {
            if let Some(value) = self.field_json(descriptor.name) {
                record.insert(descriptor.name.to_string(), value);
            }
        }
        record
    }

    /// The rule's key within its parent repository, when set and valid.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.valid().map(String::as_str)
    }

    /// Check all cross-field consistency invariants, accumulating findings
    /// into `result`.
    ///
    /// A pure read-only pass: all invariants are checked independently and
    /// every violation is reported. A field in the unset or invalid state
    /// does not trigger checks on its side of a pair (lower-level field
    /// validation reports those separately) — with one exception: a rule
    /// that requires approving reviews but leaves the review count unset
    /// violates the invariant that the count be set and non-negative.
    pub fn validate(&self, repo_name: &str, result: &mut ValidationResult) {
        let header = format!(
            "{MODEL_OBJECT_NAME}[repo=\"{repo_name}\",pattern=\"{pattern}\"]",
            pattern = self.pattern_for_display(),
        );

        if self.requires_approving_reviews.valid() == Some(&true) {
            match &self.required_approving_review_count {
                FieldValue::Unset => result.add_error(format!(
                    "{header} has 'requiresApprovingReviews' enabled but \
                     'requiredApprovingReviewCount' is not set."
                )),
                FieldValue::Valid(count) if *count < 0 => result.add_error(format!(
                    "{header} has 'requiresApprovingReviews' enabled but \
                     'requiredApprovingReviewCount' is negative."
                )),
                _ => {}
            }
        }

        if self.restricts_review_dismissals.valid() == Some(&false)
            && self
                .review_dismissal_allowances
                .valid()
                .is_some_and(|allowances| !allowances.is_empty())
        {
            result.add_error(format!(
                "{header} has 'restrictsReviewDismissals' disabled but \
                 'reviewDismissalAllowances' is set."
            ));
        }

        if self.allows_force_pushes.valid() == Some(&true)
            && self
                .bypass_force_push_allowances
                .valid()
                .is_some_and(|allowances| !allowances.is_empty())
        {
            result.add_error(format!(
                "{header} has 'allowsForcePushes' enabled but \
                 'bypassForcePushAllowances' is not empty."
            ));
        }

        if self.requires_status_checks.valid() == Some(&false)
            && self
                .required_status_checks
                .valid()
                .is_some_and(|checks| !checks.is_empty())
        {
            result.add_error(format!(
                "{header} has 'requiresStatusChecks' disabled but \
                 'requiredStatusChecks' is not empty."
            ));
        }
    }

    fn pattern_for_display(&self) -> &str {
        self.pattern().unwrap_or("<unset>")
    }

    fn from_record(record: &ProjectedRecord) -> Self {
        Self {
            id: field(record, "id"),
            pattern: field(record, "pattern"),
            allows_deletions: field(record, "allowsDeletions"),
            allows_force_pushes: field(record, "allowsForcePushes"),
            dismisses_stale_reviews: field(record, "dismissesStaleReviews"),
            is_admin_enforced: field(record, "isAdminEnforced"),
            lock_allows_fetch_and_merge: field(record, "lockAllowsFetchAndMerge"),
            lock_branch: field(record, "lockBranch"),
            bypass_force_push_allowances: field(record, "bypassForcePushAllowances"),
            bypass_pull_request_allowances: field(record, "bypassPullRequestAllowances"),
            push_restrictions: field(record, "pushRestrictions"),
            require_last_push_approval: field(record, "requireLastPushApproval"),
            required_approving_review_count: field(record, "requiredApprovingReviewCount"),
            requires_approving_reviews: field(record, "requiresApprovingReviews"),
            requires_code_owner_reviews: field(record, "requiresCodeOwnerReviews"),
            requires_commit_signatures: field(record, "requiresCommitSignatures"),
            requires_conversation_resolution: field(record, "requiresConversationResolution"),
            requires_linear_history: field(record, "requiresLinearHistory"),
            requires_status_checks: field(record, "requiresStatusChecks"),
            requires_strict_status_checks: field(record, "requiresStrictStatusChecks"),
            restricts_review_dismissals: field(record, "restrictsReviewDismissals"),
            review_dismissal_allowances: field(record, "reviewDismissalAllowances"),
            required_status_checks: field(record, "requiredStatusChecks"),
        }
    }

    fn field_json(&self, name: &str) -> Option<Value> {
        match name {
            "id" => self.id.to_json(),
            "pattern" => self.pattern.to_json(),
            "allowsDeletions" => self.allows_deletions.to_json(),
            "allowsForcePushes" => self.allows_force_pushes.to_json(),
            "dismissesStaleReviews" => self.dismisses_stale_reviews.to_json(),
            "isAdminEnforced" => self.is_admin_enforced.to_json(),
            "lockAllowsFetchAndMerge" => self.lock_allows_fetch_and_merge.to_json(),
            "lockBranch" => self.lock_branch.to_json(),
            "bypassForcePushAllowances" => self.bypass_force_push_allowances.to_json(),
            "bypassPullRequestAllowances" => self.bypass_pull_request_allowances.to_json(),
            "pushRestrictions" => self.push_restrictions.to_json(),
            "requireLastPushApproval" => self.require_last_push_approval.to_json(),
            "requiredApprovingReviewCount" => self.required_approving_review_count.to_json(),
            "requiresApprovingReviews" => self.requires_approving_reviews.to_json(),
            "requiresCodeOwnerReviews" => self.requires_code_owner_reviews.to_json(),
            "requiresCommitSignatures" => self.requires_commit_signatures.to_json(),
            "requiresConversationResolution" => self.requires_conversation_resolution.to_json(),
            "requiresLinearHistory" => self.requires_linear_history.to_json(),
            "requiresStatusChecks" => self.requires_status_checks.to_json(),
            "requiresStrictStatusChecks" => self.requires_strict_status_checks.to_json(),
            "restrictsReviewDismissals" => self.restricts_review_dismissals.to_json(),
            "reviewDismissalAllowances" => self.review_dismissal_allowances.to_json(),
            "requiredStatusChecks" => self.required_status_checks.to_json(),
            _ => None,
        }
    }
}
