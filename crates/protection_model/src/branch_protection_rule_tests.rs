//! Tests for the branch-protection rule entity and its conversions.

use super::*;
use crate::errors::ModelError;
use crate::resolver::ResolverError;
use crate::validation::FindingSeverity;
use async_trait::async_trait;
use projection_engine::ProjectionError;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

/// Mock resolver mapping each actor reference to `id:<reference>` and app
/// slugs through a fixed table; records every batched call.
struct MockResolver {
    app_ids: HashMap<String, String>,
    actor_calls: Mutex<Vec<Vec<String>>>,
    app_calls: Mutex<Vec<BTreeSet<String>>>,
}

impl MockResolver {
    fn new(apps: &[(&str, &str)]) -> Self {
        Self {
            app_ids: apps
                .iter()
                .map(|(slug, id)| (slug.to_string(), id.to_string()))
                .collect(),
            actor_calls: Mutex::new(Vec::new()),
            app_calls: Mutex::new(Vec::new()),
        }
    }

    fn actor_calls(&self) -> Vec<Vec<String>> {
        self.actor_calls.lock().expect("lock poisoned").clone()
    }

    fn app_calls(&self) -> Vec<BTreeSet<String>> {
        self.app_calls.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl IdentifierResolver for MockResolver {
    async fn resolve_actor_ids(&self, references: &[String]) -> Result<Vec<String>, ResolverError> {
        self.actor_calls
            .lock()
            .expect("lock poisoned")
            .push(references.to_vec());
        Ok(references.iter().map(|r| format!("id:{r}")).collect())
    }

    async fn resolve_app_ids(
        &self,
        slugs: &BTreeSet<String>,
    ) -> Result<HashMap<String, String>, ResolverError> {
        self.app_calls
            .lock()
            .expect("lock poisoned")
            .push(slugs.clone());
        let mut resolved = HashMap::new();
        for slug in slugs {
            let id = self
                .app_ids
                .get(slug)
                .ok_or_else(|| ResolverError::UnknownApp { slug: slug.clone() })?;
            resolved.insert(slug.clone(), id.clone());
        }
        Ok(resolved)
    }
}

fn record(value: serde_json::Value) -> SourceRecord {
    value
        .as_object()
        .expect("test fixture must be a JSON object")
        .clone()
}

/// Full declarative model fixture, every field specified.
fn model_data() -> SourceRecord {
    record(json!({
        "pattern": "main",
        "allowsDeletions": false,
        "allowsForcePushes": false,
        "dismissesStaleReviews": false,
        "isAdminEnforced": false,
        "lockAllowsFetchAndMerge": false,
        "lockBranch": false,
        "bypassForcePushAllowances": ["/netomi"],
        "bypassPullRequestAllowances": ["/netomi"],
        "pushRestrictions": ["/netomi"],
        "requireLastPushApproval": false,
        "requiredApprovingReviewCount": 2,
        "requiresApprovingReviews": true,
        "requiresCodeOwnerReviews": false,
        "requiresCommitSignatures": false,
        "requiresConversationResolution": false,
        "requiresLinearHistory": false,
        "requiresStatusChecks": true,
        "requiresStrictStatusChecks": false,
        "restrictsReviewDismissals": false,
        "reviewDismissalAllowances": [],
        "requiredStatusChecks": ["eclipse-eca-validation:eclipsefdn/eca", "any:Run CI"]
    }))
}

/// Full provider live-state fixture with structured status checks.
fn provider_data() -> SourceRecord {
    record(json!({
        "id": "BPR_kwDOI9xAhM4CC77t",
        "pattern": "main",
        "allowsDeletions": false,
        "allowsForcePushes": false,
        "dismissesStaleReviews": false,
        "isAdminEnforced": false,
        "lockAllowsFetchAndMerge": false,
        "lockBranch": false,
        "bypassForcePushAllowances": ["/netomi"],
        "bypassPullRequestAllowances": ["/netomi"],
        "pushRestrictions": ["/netomi"],
        "requireLastPushApproval": false,
        "requiredApprovingReviewCount": 2,
        "requiresApprovingReviews": true,
        "requiresCodeOwnerReviews": false,
        "requiresCommitSignatures": false,
        "requiresConversationResolution": false,
        "requiresLinearHistory": false,
        "requiresStatusChecks": true,
        "requiresStrictStatusChecks": false,
        "restrictsReviewDismissals": false,
        "reviewDismissalAllowances": ["/netomi"],
        "requiredStatusChecks": [
            { "app": { "slug": "github-actions" }, "context": "build" },
            { "app": null, "context": "Run CI" }
        ]
    }))
}

#[test]
fn test_from_model_data_full_fixture() {
    let rule = BranchProtectionRule::from_model_data(&model_data());

    assert!(rule.id.is_unset());
    assert_eq!(rule.pattern(), Some("main"));
    assert_eq!(rule.allows_deletions.valid(), Some(&false));
    assert_eq!(rule.required_approving_review_count.valid(), Some(&2));
    assert_eq!(rule.requires_approving_reviews.valid(), Some(&true));
    assert_eq!(
        rule.push_restrictions.valid(),
        Some(&vec!["/netomi".to_string()])
    );
    assert_eq!(rule.review_dismissal_allowances.valid(), Some(&Vec::new()));
    assert_eq!(
        rule.required_status_checks.valid(),
        Some(&vec![
            "eclipse-eca-validation:eclipsefdn/eca".to_string(),
            "any:Run CI".to_string()
        ])
    );
}

#[test]
fn test_from_model_data_missing_key_is_unset_not_false() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({ "pattern": "main" })));

    assert!(rule.lock_branch.is_unset());
    assert_eq!(rule.lock_branch.valid(), None);
    assert!(rule.required_status_checks.is_unset());
    assert_eq!(rule.pattern(), Some("main"));
}

#[test]
fn test_from_model_data_null_is_invalid_not_unset() {
    let rule =
        BranchProtectionRule::from_model_data(&record(json!({ "lockBranch": null })));

    assert!(!rule.lock_branch.is_unset());
    assert!(!rule.lock_branch.is_set_and_valid());
}

#[test]
fn test_from_provider_data_full_fixture() {
    let rule =
        BranchProtectionRule::from_provider_data(&provider_data()).expect("complete response");

    assert_eq!(rule.id.valid().map(String::as_str), Some("BPR_kwDOI9xAhM4CC77t"));
    assert_eq!(rule.pattern(), Some("main"));
    assert_eq!(rule.lock_branch.valid(), Some(&false));
    assert_eq!(
        rule.review_dismissal_allowances.valid(),
        Some(&vec!["/netomi".to_string()])
    );
    // Structured checks decode to compact tokens, default app elided.
    assert_eq!(
        rule.required_status_checks.valid(),
        Some(&vec!["build".to_string(), "any:Run CI".to_string()])
    );
}

#[test]
fn test_from_provider_data_missing_field_is_fatal() {
    let mut data = provider_data();
    data.remove("lockBranch");

    let result = BranchProtectionRule::from_provider_data(&data);

    assert_eq!(
        result,
        Err(ModelError::Projection(ProjectionError::MissingField {
            field: "lockBranch".to_string()
        }))
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_to_provider_data_resolves_references() {
    let resolver = MockResolver::new(&[
        ("github-actions", "15368"),
        ("eclipse-eca-validation", "77"),
    ]);
    let rule = BranchProtectionRule::from_model_data(&model_data());

    let payload = rule
        .to_provider_data(&resolver)
        .await
        .expect("all references resolve");

    // Human-readable fields are replaced by resolved identifier fields.
    assert!(!payload.contains_key("pushRestrictions"));
    assert_eq!(payload.get("pushActorIds"), Some(&json!(["id:/netomi"])));
    assert_eq!(payload.get("restrictsPushes"), Some(&json!(true)));
    assert!(!payload.contains_key("bypassPullRequestAllowances"));
    assert_eq!(
        payload.get("bypassPullRequestActorIds"),
        Some(&json!(["id:/netomi"]))
    );
    assert!(!payload.contains_key("bypassForcePushAllowances"));
    assert_eq!(
        payload.get("bypassForcePushActorIds"),
        Some(&json!(["id:/netomi"]))
    );
    // Empty allowance list resolves to an empty id list without a lookup.
    assert!(!payload.contains_key("reviewDismissalAllowances"));
    assert_eq!(payload.get("reviewDismissalActorIds"), Some(&json!([])));

    // Status-check tokens become structured objects.
    assert_eq!(
        payload.get("requiredStatusChecks"),
        Some(&json!([
            { "appId": "77", "context": "eclipsefdn/eca" },
            { "appId": "any", "context": "Run CI" }
        ]))
    );

    // External-only fields never appear in a write payload.
    assert!(!payload.contains_key("id"));
    assert_eq!(payload.get("pattern"), Some(&json!("main")));
    assert_eq!(payload.get("lockBranch"), Some(&json!(false)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_to_provider_data_batches_lookups() {
    let resolver = MockResolver::new(&[("eclipse-eca-validation", "77")]);
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "pushRestrictions": ["team-a", "alice"],
        "requiredStatusChecks": [
            "eclipse-eca-validation:one",
            "eclipse-eca-validation:two",
            "any:three"
        ]
    })));

    rule.to_provider_data(&resolver)
        .await
        .expect("all references resolve");

    // One call per field, with the distinct slug set for status checks.
    assert_eq!(
        resolver.actor_calls(),
        vec![vec!["team-a".to_string(), "alice".to_string()]]
    );
    let expected_slugs: BTreeSet<String> =
        std::iter::once("eclipse-eca-validation".to_string()).collect();
    assert_eq!(resolver.app_calls(), vec![expected_slugs]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_to_provider_data_omits_unset_fields() {
    let resolver = MockResolver::new(&[]);
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "release/*",
        "isAdminEnforced": true
    })));

    let payload = rule
        .to_provider_data(&resolver)
        .await
        .expect("nothing to resolve");

    assert_eq!(payload.len(), 2);
    assert_eq!(payload.get("pattern"), Some(&json!("release/*")));
    assert_eq!(payload.get("isAdminEnforced"), Some(&json!(true)));
    assert!(resolver.actor_calls().is_empty());
    assert!(resolver.app_calls().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_to_provider_data_empty_push_restrictions_flag_false() {
    let resolver = MockResolver::new(&[]);
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "pushRestrictions": []
    })));

    let payload = rule
        .to_provider_data(&resolver)
        .await
        .expect("nothing to resolve");

    assert_eq!(payload.get("restrictsPushes"), Some(&json!(false)));
    assert_eq!(payload.get("pushActorIds"), Some(&json!([])));
    assert!(resolver.actor_calls().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn test_to_provider_data_unknown_app_aborts() {
    let resolver = MockResolver::new(&[]);
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "requiredStatusChecks": ["ghost-app:check"]
    })));

    let result = rule.to_provider_data(&resolver).await;

    assert_eq!(
        result,
        Err(ModelError::Resolver(ResolverError::UnknownApp {
            slug: "ghost-app".to_string()
        }))
    );
}

#[test]
fn test_to_model_data_round_trips_set_fields() {
    let rule = BranchProtectionRule::from_model_data(&model_data());
    let data = rule.to_model_data();

    assert_eq!(data, model_data());
    assert!(!data.contains_key("id"));
}

#[test]
fn test_validate_clean_rule_has_no_findings() {
    let rule = BranchProtectionRule::from_model_data(&model_data());
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert!(result.is_valid());
    assert!(result.findings().is_empty());
}

#[test]
fn test_validate_review_count_unset() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "requiresApprovingReviews": true
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert_eq!(result.findings().len(), 1);
    let finding = &result.findings()[0];
    assert_eq!(finding.severity, FindingSeverity::Error);
    assert_eq!(
        finding.message,
        "branch_protection_rule[repo=\"test-repo\",pattern=\"main\"] has \
         'requiresApprovingReviews' enabled but 'requiredApprovingReviewCount' is not set."
    );
}

#[test]
fn test_validate_review_count_negative() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "requiresApprovingReviews": true,
        "requiredApprovingReviewCount": -1
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert_eq!(result.findings().len(), 1);
    assert!(result.findings()[0]
        .message
        .contains("'requiredApprovingReviewCount' is negative"));
}

#[test]
fn test_validate_review_count_set_is_clean() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "requiresApprovingReviews": true,
        "requiredApprovingReviewCount": 2
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert!(result.findings().is_empty());
}

#[test]
fn test_validate_invalid_review_count_is_skipped() {
    // Malformed values are reported by lower-level field validation, not
    // duplicated here.
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "requiresApprovingReviews": true,
        "requiredApprovingReviewCount": "two"
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert!(result.findings().is_empty());
}

#[test]
fn test_validate_dismissal_allowances_without_restriction() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "restrictsReviewDismissals": false,
        "reviewDismissalAllowances": ["alice"]
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert_eq!(result.findings().len(), 1);
    assert_eq!(
        result.findings()[0].message,
        "branch_protection_rule[repo=\"test-repo\",pattern=\"main\"] has \
         'restrictsReviewDismissals' disabled but 'reviewDismissalAllowances' is set."
    );
}

#[test]
fn test_validate_empty_dismissal_allowances_is_clean() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "restrictsReviewDismissals": false,
        "reviewDismissalAllowances": []
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert!(result.findings().is_empty());
}

#[test]
fn test_validate_force_push_bypass_conflict() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "allowsForcePushes": true,
        "bypassForcePushAllowances": ["/netomi"]
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert_eq!(result.findings().len(), 1);
    assert_eq!(
        result.findings()[0].message,
        "branch_protection_rule[repo=\"test-repo\",pattern=\"main\"] has \
         'allowsForcePushes' enabled but 'bypassForcePushAllowances' is not empty."
    );
}

#[test]
fn test_validate_status_checks_without_requirement() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "requiresStatusChecks": false,
        "requiredStatusChecks": ["build"]
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert_eq!(result.findings().len(), 1);
    assert_eq!(
        result.findings()[0].message,
        "branch_protection_rule[repo=\"test-repo\",pattern=\"main\"] has \
         'requiresStatusChecks' disabled but 'requiredStatusChecks' is not empty."
    );
}

#[test]
fn test_validate_reports_every_violation() {
    let rule = BranchProtectionRule::from_model_data(&record(json!({
        "pattern": "main",
        "requiresApprovingReviews": true,
        "restrictsReviewDismissals": false,
        "reviewDismissalAllowances": ["alice"],
        "allowsForcePushes": true,
        "bypassForcePushAllowances": ["bob"],
        "requiresStatusChecks": false,
        "requiredStatusChecks": ["build"]
    })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert_eq!(result.findings().len(), 4);
    assert!(result.findings().iter().all(|f| f.severity == FindingSeverity::Error));
}

#[test]
fn test_validate_unset_guards_skip_checks() {
    // Nothing is set: no invariant can fire.
    let rule = BranchProtectionRule::from_model_data(&record(json!({ "pattern": "main" })));
    let mut result = ValidationResult::new();

    rule.validate("test-repo", &mut result);

    assert!(result.findings().is_empty());
}
