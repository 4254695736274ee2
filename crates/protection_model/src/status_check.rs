//! Codec for app-scoped status-check tokens.
//!
//! The declarative model writes a required status check as a single compact
//! token, `app-slug:context` or a bare `context`, while the provider's wire
//! shape is a structured `{appId, context}` object. This module converts
//! between the two:
//!
//! - decoding elides the platform's default automation app for readability
//!   (a check reported by it is written as the bare context);
//! - an absent app on the provider side means "any app" and decodes to the
//!   reserved `any:` prefix;
//! - encoding resolves every distinct non-`any` slug in one batched resolver
//!   call before re-walking the token list.

use std::collections::{BTreeSet, HashMap};

use serde_json::{json, Value};
use tracing::debug;

use projection_engine::{ProjectionError, ProjectionResult};

use crate::errors::ModelResult;
use crate::resolver::{IdentifierResolver, ResolverError};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "status_check_tests.rs"]
mod tests;

/// Reserved slug matching a check reported by any app.
pub const ANY_APP: &str = "any";

/// Slug of the platform's default automation app, elided from tokens.
pub const DEFAULT_AUTOMATION_APP: &str = "github-actions";

/// Decode one provider status-check object into a compact token.
///
/// The provider object carries an `app` reference (`null` meaning "any app")
/// and a `context` string. Missing keys are reported as missing fields since
/// they indicate provider schema drift.
///
/// Usable directly as the element transform of a
/// [`Projection`](projection_engine::Projection) rule.
pub fn decode(check: &Value) -> ProjectionResult<Value> {
    let object = check
        .as_object()
        .ok_or_else(|| ProjectionError::InvalidShape {
            field: "requiredStatusChecks".to_string(),
            reason: "expected a status check object".to_string(),
        })?;

    let context = object
        .get("context")
        .and_then(Value::as_str)
        .ok_or_else(|| ProjectionError::MissingField {
            field: "requiredStatusChecks.context".to_string(),
        })?;

    let app = object
        .get("app")
        .ok_or_else(|| ProjectionError::MissingField {
            field: "requiredStatusChecks.app".to_string(),
        })?;

    let token = match app {
        Value::Null => format!("{ANY_APP}:{context}"),
        other => {
            let slug = other
                .get("slug")
                .and_then(Value::as_str)
                .ok_or_else(|| ProjectionError::MissingField {
                    field: "requiredStatusChecks.app.slug".to_string(),
                })?;
            if slug == DEFAULT_AUTOMATION_APP {
                context.to_string()
            } else {
                format!("{slug}:{context}")
            }
        }
    };

    Ok(Value::String(token))
}

/// Split a token into its app slug and context.
///
/// The split happens on the first `:`; a token without one belongs to the
/// default automation app.
pub fn split_token(token: &str) -> (&str, &str) {
    match token.split_once(':') {
        Some((slug, context)) => (slug, context),
        None => (DEFAULT_AUTOMATION_APP, token),
    }
}

/// Encode a list of tokens into provider `{appId, context}` objects.
///
/// Collects the set of distinct non-`any` slugs across the whole list,
/// resolves them in one batched call, then re-walks the list applying the
/// resolved mapping. The `any` slug encodes to the sentinel app id `"any"`
/// without touching the resolver.
///
/// # Errors
///
/// Returns [`ResolverError::UnknownApp`] (wrapped in
/// [`ModelError`](crate::ModelError)) when a slug cannot be resolved; the
/// conversion must not proceed with a partially resolved list.
pub async fn encode(
    tokens: &[String],
    resolver: &dyn IdentifierResolver,
) -> ModelResult<Vec<Value>> {
    let mut slugs = BTreeSet::new();
    for token in tokens {
        let (slug, _) = split_token(token);
        if slug != ANY_APP {
            slugs.insert(slug.to_string());
        }
    }

    let app_ids: HashMap<String, String> = if slugs.is_empty() {
        HashMap::new()
    } else {
        debug!(
            slug_count = slugs.len(),
            "Resolving status check app slugs"
        );
        resolver.resolve_app_ids(&slugs).await?
    };

    let mut encoded = Vec::with_capacity(tokens.len());
    for token in tokens {
        let (slug, context) = split_token(token);
        let app_id = if slug == ANY_APP {
            Value::String(ANY_APP.to_string())
        } else {
            let id = app_ids
                .get(slug)
                .ok_or_else(|| ResolverError::UnknownApp {
                    slug: slug.to_string(),
                })?;
            Value::String(id.clone())
        };
        encoded.push(json!({ "appId": app_id, "context": context }));
    }

    Ok(encoded)
}
