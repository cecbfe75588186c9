//! Relation handling.
//!
//! The backend wraps related records in an envelope, `{"data": ...}`, where
//! `data` is null, a single `{"id": .., "attributes": ..}` reference, or a
//! list of them. Locally a relation is always a flat list of ids; these
//! helpers convert between the two and mutate relation lists append-only.

use crate::{Attributes, RecordId};
use serde_json::Value;

/// Returns true when `value` is a relation envelope: a mapping with a `data` key
/// whose payload is null, empty, a reference, or a list of references.
pub fn is_relation_envelope(value: &Value) -> bool {
    match value {
        Value::Object(map) => match map.get("data") {
            Some(Value::Null | Value::Object(_) | Value::Array(_)) => true,
            Some(Value::String(s)) => s.is_empty(),
            _ => false,
        },
        _ => false,
    }
}

/// Collapses one relation envelope into a list of ids.
///
/// Returns `None` when `value` is not an envelope, so callers can leave it alone.
/// References without an `id` are skipped; order is preserved.
pub fn normalize_relation(value: &Value) -> Option<Value> {
    if !is_relation_envelope(value) {
        return None;
    }

    let ids = match &value["data"] {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("id").cloned())
            .collect(),
        Value::Object(reference) => reference.get("id").cloned().into_iter().collect(),
        _ => Vec::new(),
    };

    Some(Value::Array(ids))
}

/// Replaces every relation envelope in `attributes` with its list of ids.
///
/// Values that are not envelopes pass through untouched, so running this over
/// already-normalized attributes is a no-op.
pub fn normalize_relations(attributes: &mut Attributes) {
    for value in attributes.values_mut() {
        if let Some(ids) = normalize_relation(value) {
            *value = ids;
        }
    }
}

/// Appends `id` to the relation list stored under `field`.
///
/// An absent or null field starts as an empty list. A lone scalar id (as left
/// behind by a pointer assignment) is promoted to a one-element list first.
/// Existing entries are never removed.
pub fn append_relation(attributes: &mut Attributes, field: &str, id: &RecordId) {
    match attributes.get_mut(field) {
        Some(Value::Array(ids)) => ids.push(id.to_value()),
        Some(Value::Null) | None => {
            attributes.insert(field.to_string(), Value::Array(vec![id.to_value()]));
        }
        Some(other) => {
            let previous = other.take();
            *other = Value::Array(vec![previous, id.to_value()]);
        }
    }
}

/// Points the singular relation `field` at `id`, replacing whatever was there.
pub fn set_pointer(attributes: &mut Attributes, field: &str, id: &RecordId) {
    attributes.insert(field.to_string(), id.to_value());
}

/// Merges `patch` into the mapping stored under `field`, one level deep.
///
/// If the field is unset (or not a mapping) it becomes exactly `patch`.
/// Otherwise each key of `patch` overwrites the same key; nested values are
/// replaced wholesale.
pub fn merge_shallow(attributes: &mut Attributes, field: &str, patch: Attributes) {
    match attributes.get_mut(field) {
        Some(Value::Object(existing)) => {
            for (key, value) in patch {
                existing.insert(key, value);
            }
        }
        _ => {
            attributes.insert(field.to_string(), Value::Object(patch));
        }
    }
}
