use crate::relation::{append_relation, merge_shallow, normalize_relations, set_pointer};
use crate::{Attributes, Collection, ModelError, ModelResult, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// A record exactly as the backend returned it: an id plus the raw attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: RecordId,
    pub attributes: Attributes,
}

impl RawRecord {
    /// Extracts `id` and `attributes` from one element of a response's `data`.
    ///
    /// Fails without side effects if either field is missing or mis-shaped.
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        let record = value
            .as_object()
            .ok_or_else(|| ModelError::MalformedRecord("record is not an object".to_string()))?;

        let id = record
            .get("id")
            .ok_or_else(|| ModelError::MalformedRecord("missing id".to_string()))
            .and_then(|id| {
                RecordId::from_value(id).ok_or_else(|| {
                    ModelError::MalformedRecord(format!("id is not an integer or string: {id}"))
                })
            })?;

        let attributes = match record.get("attributes") {
            Some(Value::Object(attributes)) => attributes.clone(),
            Some(other) => {
                return Err(ModelError::MalformedRecord(format!(
                    "attributes is not an object: {other}"
                )));
            }
            None => return Err(ModelError::MalformedRecord("missing attributes".to_string())),
        };

        Ok(Self { id, attributes })
    }

    /// Strips relation envelopes down to id lists.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        normalize_relations(&mut self.attributes);
        self
    }
}

/// The local representative of one remote record.
///
/// `collection` is fixed at construction. `id` stays `None` until the record
/// has been confirmed by the backend; `attributes` is the local view of the
/// remote fields between synchronizations.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    collection: Collection,
    pub id: Option<RecordId>,
    pub attributes: Attributes,
}

impl Entity {
    /// Creates a new, never-synchronized entity in `collection`.
    pub fn new(collection: impl Into<Collection>) -> Self {
        Self {
            collection: collection.into(),
            id: None,
            attributes: Attributes::new(),
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// True once the backend has confirmed this record.
    pub fn is_synced(&self) -> bool {
        self.id.is_some()
    }

    /// Adopts a raw backend record: sets `id` and replaces `attributes` with
    /// the relation-normalized copy.
    ///
    /// On error the entity is left untouched.
    pub fn parse_response(&mut self, raw: &Value) -> ModelResult<()> {
        let record = RawRecord::from_value(raw)?.normalized();
        self.adopt(record);
        Ok(())
    }

    /// Replaces `id` and `attributes` with an already-parsed record.
    pub fn adopt(&mut self, record: RawRecord) {
        self.id = Some(record.id);
        self.attributes = record.attributes;
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).and_then(Value::as_str)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.attributes.get(field).and_then(Value::as_i64)
    }

    /// Sets a single attribute, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.attributes.insert(field.into(), value.into())
    }

    /// The `name` attribute, which is the lookup key for `spawn`.
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Reads a normalized relation field as ids.
    ///
    /// A lone scalar id counts as a one-element relation; anything else is empty.
    pub fn relation_ids(&self, field: &str) -> Vec<RecordId> {
        match self.attributes.get(field) {
            Some(Value::Array(ids)) => ids.iter().filter_map(RecordId::from_value).collect(),
            Some(value) => RecordId::from_value(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Appends `id` to the relation list under `field`, keeping prior entries.
    pub fn append_relation(&mut self, field: &str, id: &RecordId) {
        append_relation(&mut self.attributes, field, id);
    }

    /// Overwrites the singular pointer `field` with `id`.
    pub fn set_pointer(&mut self, field: &str, id: &RecordId) {
        set_pointer(&mut self.attributes, field, id);
    }

    /// Shallow-merges `patch` into the mapping under `field`.
    pub fn merge_into(&mut self, field: &str, patch: Attributes) {
        merge_shallow(&mut self.attributes, field, patch);
    }

    /// JSON view of the record: `{"id": .., "attributes": ..}`.
    ///
    /// The collection tag and any transport state are not part of it.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "attributes": self.attributes,
        })
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
