//! Generic key/value projection between structured JSON records.
//!
//! This crate is the mapping substrate used to translate between the three
//! representations of a managed entity: the user-authored declarative model,
//! the provider's live API representation, and the wire payload sent to the
//! provider. A projection is an explicit, ordered list of
//! `(target field, extraction rule)` pairs evaluated by a small interpreter
//! against a source record. The rule set is plain data, so mappings can be
//! built programmatically (e.g. from a field-descriptor table) and unit-tested
//! independently of any entity's shape.
//!
//! Extraction rules cover the four cases the conversion paths need:
//!
//! - a required key lookup, where absence is a schema mismatch and fatal;
//! - an optional key lookup, where absence resolves to the explicit
//!   [`Slot::Unset`] state (distinct from JSON `null`);
//! - constant injection, used to splice computed values (resolved identifier
//!   lists, derived flags) into the output;
//! - an element-wise fallible transform over a required list field.
//!
//! Projections are pure: they perform no I/O and never mutate the source.

pub mod errors;
pub mod projection;
pub mod record;

pub use errors::{ProjectionError, ProjectionResult};
pub use projection::{ElementTransform, Extraction, Projection};
pub use record::{ProjectedRecord, Slot};

/// A source record: a JSON object as handed over by the configuration loader
/// or the provider client.
pub type SourceRecord = serde_json::Map<String, serde_json::Value>;
