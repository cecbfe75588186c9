//! Typed entities and their relationship mutators.
//!
//! Each variant wraps an [`Entity`] with a fixed collection and derefs to it,
//! so the generic accessors and `Backend::{spawn, push, pull}` work on all of
//! them. Mutators change relation fields append-only and then push.

use crate::backend::Backend;
use crate::error::ClientResult;
use shadows_model::{Attributes, Collection, Entity};
use std::ops::{Deref, DerefMut};

macro_rules! entity_variant {
    ($(#[$meta:meta])* $name:ident => $collection:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Entity);

        impl $name {
            pub const COLLECTION: Collection = $collection;

            /// Creates an empty, never-synchronized record.
            pub fn new() -> Self {
                Self(Entity::new(Self::COLLECTION))
            }

            pub fn entity(&self) -> &Entity {
                &self.0
            }

            pub fn into_entity(self) -> Entity {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Deref for $name {
            type Target = Entity;

            fn deref(&self) -> &Entity {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Entity {
                &mut self.0
            }
        }

        impl From<$name> for Entity {
            fn from(variant: $name) -> Entity {
                variant.0
            }
        }
    };
}

entity_variant!(
    /// A device ("thing") that reports state through its shadow.
    Device => Collection::DEVICES
);
entity_variant!(
    /// An experiment grouping plates.
    Experiment => Collection::EXPERIMENTS
);
entity_variant!(
    /// A plate holding a grid of wells.
    Plate => Collection::PLATES
);
entity_variant!(Well => Collection::WELLS);
entity_variant!(Sample => Collection::SAMPLES);

impl Device {
    /// Shallow-merges `patch` into the device shadow and pushes.
    ///
    /// An unset shadow becomes `patch`; otherwise top-level keys of `patch`
    /// overwrite the existing ones and nested values are replaced whole.
    pub async fn merge_into_shadow(
        &mut self,
        backend: &Backend,
        patch: Attributes,
    ) -> ClientResult<()> {
        Backend::require_id(&self.0)?;
        self.0.merge_into("shadow", patch);
        backend.push(&mut self.0).await
    }

    /// Makes `plate` the current plate and records it in the plate history.
    ///
    /// The backend mirrors the history onto the plate's `things` relation.
    pub async fn set_current_plate(
        &mut self,
        backend: &Backend,
        plate: &Plate,
    ) -> ClientResult<()> {
        Backend::require_id(&self.0)?;
        let plate_id = Backend::require_id(plate)?;
        self.0.append_relation("plates", &plate_id);
        self.0.set_pointer("current_plate", &plate_id);
        backend.push(&mut self.0).await
    }

    /// Makes `experiment` the current experiment and records it in the history.
    pub async fn set_current_experiment(
        &mut self,
        backend: &Backend,
        experiment: &Experiment,
    ) -> ClientResult<()> {
        Backend::require_id(&self.0)?;
        let experiment_id = Backend::require_id(experiment)?;
        self.0.append_relation("experiments", &experiment_id);
        self.0.set_pointer("current_experiment", &experiment_id);
        backend.push(&mut self.0).await
    }
}

impl Experiment {
    pub async fn add_plate(&mut self, backend: &Backend, plate: &Plate) -> ClientResult<()> {
        Backend::require_id(&self.0)?;
        let plate_id = Backend::require_id(plate)?;
        self.0.append_relation("plates", &plate_id);
        backend.push(&mut self.0).await
    }
}

impl Plate {
    /// Associates `device` with this plate. The device's current plate is
    /// not changed.
    pub async fn add_thing(&mut self, backend: &Backend, device: &Device) -> ClientResult<()> {
        Backend::require_id(&self.0)?;
        let device_id = Backend::require_id(device)?;
        self.0.append_relation("things", &device_id);
        backend.push(&mut self.0).await
    }
}
