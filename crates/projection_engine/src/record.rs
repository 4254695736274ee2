//! Projected record and field slot types.
//!
//! The output of a projection is an ordered record whose fields are either
//! explicitly unset or carry a JSON value. The unset state exists so that
//! "the user did not specify this field" stays distinguishable from "the user
//! specified `null`"; comparisons always go through the state-checking
//! helpers rather than a shared sentinel value.

use serde_json::Value;

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

/// A single projected field: either explicitly unset or set to a JSON value.
///
/// `Set(Value::Null)` and `Unset` are different states: the former means the
/// source record contained the key with a `null` value, the latter means the
/// key was absent and the mapping tolerated that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The field was absent from the source record.
    Unset,
    /// The field carries a value (possibly `null`).
    Set(Value),
}

impl Slot {
    /// Check whether this slot is in the unset state.
    pub fn is_unset(&self) -> bool {
        matches!(self, Slot::Unset)
    }

    /// Get the contained value, or `None` when unset.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Unset => None,
            Slot::Set(value) => Some(value),
        }
    }
}

/// An ordered record produced by applying a [`Projection`](crate::Projection).
///
/// Field order follows rule order in the projection that produced the record.
/// Duplicate field names are not expected; a later rule for the same name
/// simply appends and the first occurrence wins on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedRecord {
    fields: Vec<(String, Slot)>,
}

impl ProjectedRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field to the record.
    pub fn push(&mut self, name: impl Into<String>, slot: Slot) {
        self.fields.push((name.into(), slot));
    }

    /// Look up a field slot by name.
    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, slot)| slot)
    }

    /// Check whether the record contains a field with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over the fields in projection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.fields.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    /// Number of fields in the record, including unset ones.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert into a JSON object, dropping unset fields entirely.
    ///
    /// This is the final step of a model-to-provider conversion: fields the
    /// user never specified are omitted from the wire payload rather than
    /// sent as `null`.
    pub fn into_json_map(self) -> serde_json::Map<String, Value> {
        let mut map = serde_json::Map::new();
        for (name, slot) in self.fields {
            if let Slot::Set(value) = slot {
                map.insert(name, value);
            }
        }
        map
    }
}
