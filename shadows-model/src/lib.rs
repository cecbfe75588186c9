//! Entity model for the Shadows backend.
//!
//! Defines the pure, I/O-free types the client layer synchronizes:
//! - [`Entity`] — one local record: collection tag, optional id, attribute map
//! - [`Collection`] — the remote resource type a record belongs to
//! - [`RecordId`] — a backend identifier (numeric or string)
//! - [`RawRecord`] — a record as it arrives on the wire, before normalization
//! - relation helpers — envelope normalization, append-only relation lists,
//!   shallow merges of nested mappings
//!
//! Nothing in this crate talks to the network; `shadows-client` owns that.

mod collection;
mod entity;
mod error;
mod ids;
mod relation;

pub use collection::Collection;
pub use entity::{Entity, RawRecord};
pub use error::{ModelError, ModelResult};
pub use ids::RecordId;
pub use relation::{
    append_relation, is_relation_envelope, merge_shallow, normalize_relation, normalize_relations,
    set_pointer,
};

/// The attribute map carried by every entity. Insertion order is preserved.
pub type Attributes = serde_json::Map<String, serde_json::Value>;
