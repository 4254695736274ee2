//! Three-state field values.
//!
//! Declarative model fields have three possible states: absent from the user
//! configuration (unset), present but malformed (invalid), or present and
//! well-typed (valid). The states are a tagged wrapper rather than a shared
//! sentinel object, and all state queries go through the helpers below.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use projection_engine::Slot;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;

/// A model field that is unset, invalid, or set to a typed value.
///
/// `Invalid` keeps the raw JSON value that failed basic validity so that it
/// can be echoed back in diagnostics and round-tripped through a model
/// record. JSON `null` is always invalid: the model distinguishes "the user
/// did not specify this field" (`Unset`) from "the user specified null".
///
/// # Examples
///
/// ```rust
/// use protection_model::FieldValue;
/// use serde_json::json;
///
/// let count: FieldValue<i64> = FieldValue::from_json(&json!(2));
/// assert_eq!(count.valid(), Some(&2));
///
/// let malformed: FieldValue<i64> = FieldValue::from_json(&json!("two"));
/// assert!(!malformed.is_set_and_valid());
/// assert!(!malformed.is_unset());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    /// The field was not specified by the user.
    Unset,
    /// The field was specified but fails basic validity for its type.
    Invalid(Value),
    /// The field was specified and is well-typed.
    Valid(T),
}

impl<T> FieldValue<T> {
    /// Check whether the field is in the unset state.
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    /// Check whether the field is both explicitly set and internally valid.
    pub fn is_set_and_valid(&self) -> bool {
        matches!(self, FieldValue::Valid(_))
    }

    /// Get the typed value when valid, `None` otherwise.
    pub fn valid(&self) -> Option<&T> {
        match self {
            FieldValue::Valid(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: DeserializeOwned> FieldValue<T> {
    /// Interpret a raw JSON value as a typed field.
    ///
    /// `null` and values that do not deserialize as `T` land in the
    /// `Invalid` state, carrying the raw value.
    pub fn from_json(value: &Value) -> Self {
        if value.is_null() {
            return FieldValue::Invalid(Value::Null);
        }
        match serde_json::from_value::<T>(value.clone()) {
            Ok(typed) => FieldValue::Valid(typed),
            Err(_) => FieldValue::Invalid(value.clone()),
        }
    }

    /// Interpret a projected slot as a typed field.
    pub fn from_slot(slot: &Slot) -> Self {
        match slot {
            Slot::Unset => FieldValue::Unset,
            Slot::Set(value) => Self::from_json(value),
        }
    }
}

impl<T: Serialize> FieldValue<T> {
    /// JSON view of the field as it appears in a model record.
    ///
    /// Unset fields have no JSON representation and yield `None`; invalid
    /// fields echo their raw value unchanged.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Unset => None,
            FieldValue::Invalid(raw) => Some(raw.clone()),
            FieldValue::Valid(value) => Some(serde_json::to_value(value).unwrap_or(Value::Null)),
        }
    }
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Unset
    }
}
