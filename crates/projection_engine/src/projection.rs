//! The projection rule set and its interpreter.

use std::fmt;

use serde_json::Value;

use crate::errors::{ProjectionError, ProjectionResult};
use crate::record::{ProjectedRecord, Slot};
use crate::SourceRecord;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;

/// A fallible per-element transform applied by [`Extraction::MapElements`].
///
/// Boxed so that callers can capture context (e.g. a map of resolved
/// identifiers) when building a mapping.
pub type ElementTransform = Box<dyn Fn(&Value) -> ProjectionResult<Value> + Send + Sync>;

/// How a single target field is extracted from the source record.
pub enum Extraction {
    /// Look up the field name in the source; absence is a
    /// [`ProjectionError::MissingField`].
    Required,
    /// Look up the field name in the source; absence resolves to
    /// [`Slot::Unset`].
    OptionalUnset,
    /// Ignore the source and inject a constant value.
    Constant(Value),
    /// Look up the field name in the source (required), expect a list, and
    /// apply a fallible transform to each element.
    MapElements(ElementTransform),
}

impl fmt::Debug for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extraction::Required => write!(f, "Required"),
            Extraction::OptionalUnset => write!(f, "OptionalUnset"),
            Extraction::Constant(value) => write!(f, "Constant({value})"),
            Extraction::MapElements(_) => write!(f, "MapElements(..)"),
        }
    }
}

/// An ordered, data-driven mapping from target field names to extraction
/// rules.
///
/// Rules are evaluated in insertion order by [`Projection::apply`], so the
/// produced [`ProjectedRecord`] lists fields in the order they were declared.
///
/// # Examples
///
/// ```rust
/// use projection_engine::{Projection, Slot};
/// use serde_json::json;
///
/// let mut mapping = Projection::new();
/// mapping.required("pattern");
/// mapping.optional_unset("lockBranch");
/// mapping.constant("restrictsPushes", json!(true));
///
/// let source = json!({ "pattern": "main" });
/// let record = mapping
///     .apply(source.as_object().unwrap())
///     .expect("pattern is present");
///
/// assert_eq!(record.get("pattern"), Some(&Slot::Set(json!("main"))));
/// assert_eq!(record.get("lockBranch"), Some(&Slot::Unset));
/// assert_eq!(record.get("restrictsPushes"), Some(&Slot::Set(json!(true))));
/// ```
#[derive(Debug, Default)]
pub struct Projection {
    rules: Vec<(String, Extraction)>,
}

impl Projection {
    /// Create an empty projection.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a required direct lookup for `field`.
    pub fn required(&mut self, field: impl Into<String>) {
        self.rules.push((field.into(), Extraction::Required));
    }

    /// Add an optional direct lookup for `field`, defaulting to the unset
    /// state when the key is absent.
    pub fn optional_unset(&mut self, field: impl Into<String>) {
        self.rules.push((field.into(), Extraction::OptionalUnset));
    }

    /// Inject `value` as a constant under `field`.
    pub fn constant(&mut self, field: impl Into<String>, value: Value) {
        self.rules.push((field.into(), Extraction::Constant(value)));
    }

    /// Add a required list lookup for `field` with a per-element transform.
    pub fn map_elements(&mut self, field: impl Into<String>, transform: ElementTransform) {
        self.rules
            .push((field.into(), Extraction::MapElements(transform)));
    }

    /// Remove every rule targeting `field`, returning whether any existed.
    ///
    /// Used by model-to-provider conversions to pop a human-readable source
    /// field before injecting its resolved replacement.
    pub fn remove(&mut self, field: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|(name, _)| name != field);
        self.rules.len() != before
    }

    /// Check whether any rule targets `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.rules.iter().any(|(name, _)| name == field)
    }

    /// Number of rules in the projection.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the projection has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against `source`, producing a projected record.
    ///
    /// # Errors
    ///
    /// Returns a [`ProjectionError`] when a required field is absent, when a
    /// `MapElements` rule targets a non-list value, or when an element
    /// transform fails. The first failing rule aborts the projection.
    pub fn apply(&self, source: &SourceRecord) -> ProjectionResult<ProjectedRecord> {
        let mut record = ProjectedRecord::new();

        for (field, extraction) in &self.rules {
            let slot = match extraction {
                Extraction::Required => {
                    let value =
                        source
                            .get(field)
                            .ok_or_else(|| ProjectionError::MissingField {
                                field: field.clone(),
                            })?;
                    Slot::Set(value.clone())
                }
                Extraction::OptionalUnset => match source.get(field) {
                    Some(value) => Slot::Set(value.clone()),
                    None => Slot::Unset,
                },
                Extraction::Constant(value) => Slot::Set(value.clone()),
                Extraction::MapElements(transform) => {
                    let value =
                        source
                            .get(field)
                            .ok_or_else(|| ProjectionError::MissingField {
                                field: field.clone(),
                            })?;
                    let elements = value.as_array().ok_or_else(|| ProjectionError::NotAnArray {
                        field: field.clone(),
                    })?;
                    let mapped = elements
                        .iter()
                        .map(|element| transform(element))
                        .collect::<ProjectionResult<Vec<Value>>>()?;
                    Slot::Set(Value::Array(mapped))
                }
            };
            record.push(field.clone(), slot);
        }

        Ok(record)
    }
}
