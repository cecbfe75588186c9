//! Top-level entry point: credentials plus creation flows.

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::ClientResult;
use crate::transport::Transport;
use crate::variants::{Device, Experiment, Plate, Sample, Well};
use serde_json::{Value, json};
use shadows_model::Collection;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Imaging parameters attached to every plate created by [`DatabaseInteractor::create_plate`].
pub fn default_image_params() -> Value {
    json!({
        "images": true,
        "uuids": [
            "2022-07-11-i-connectoid-3",
            "2020-02-07-fluidics-imaging-2"
        ],
        "group_id": "C"
    })
}

/// Resolved credentials and a ready backend connection.
#[derive(Debug, Clone)]
pub struct DatabaseInteractor {
    credentials: Credentials,
    backend: Backend,
}

impl DatabaseInteractor {
    /// Connects over HTTP with default settings.
    pub fn new(credentials: Credentials) -> ClientResult<Self> {
        Self::with_config(credentials, &ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: &ClientConfig) -> ClientResult<Self> {
        let backend = Backend::new(&credentials, config)?;
        Ok(Self {
            credentials,
            backend,
        })
    }

    /// Uses a caller-supplied transport.
    pub fn with_transport(
        credentials: Credentials,
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let backend = Backend::with_transport(&credentials, config, transport);
        Self {
            credentials,
            backend,
        }
    }

    /// Reads `~/.aws/credentials` and connects.
    pub fn from_default_credentials() -> ClientResult<Self> {
        Self::new(Credentials::load_default()?)
    }

    /// Reads the credentials file at `path` and connects.
    pub fn from_credentials_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        Self::new(Credentials::from_path(path)?)
    }

    /// Reads credentials from a stream and connects.
    pub fn from_credentials_reader(reader: impl std::io::Read) -> ClientResult<Self> {
        Self::new(Credentials::from_reader(reader)?)
    }

    pub fn endpoint(&self) -> &str {
        &self.credentials.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn device(&self) -> Device {
        Device::new()
    }

    pub fn experiment(&self) -> Experiment {
        Experiment::new()
    }

    pub fn plate(&self) -> Plate {
        Plate::new()
    }

    pub fn well(&self) -> Well {
        Well::new()
    }

    pub fn sample(&self) -> Sample {
        Sample::new()
    }

    /// Finds or creates the device called `name`.
    pub async fn create_device(&self, kind: &str, name: &str) -> ClientResult<Device> {
        let mut device = Device::new();
        device.set("name", name);
        device.set("type", kind);
        self.backend.spawn(&mut device).await?;
        Ok(device)
    }

    /// Finds or creates the experiment called `name`.
    pub async fn create_experiment(
        &self,
        name: &str,
        description: &str,
    ) -> ClientResult<Experiment> {
        let mut experiment = Experiment::new();
        experiment.set("name", name);
        experiment.set("description", description);
        self.backend.spawn(&mut experiment).await?;
        Ok(experiment)
    }

    /// Finds or creates the plate called `name`, with its grid of wells.
    ///
    /// Wells are only created when the spawned plate has none. They are
    /// named `{plate}_well_{row}{column}`, created row by row starting at 1,
    /// and linked to the plate through their `plate` field. The plate is
    /// pulled afterwards so `wells` lists them. A failed well insert stops
    /// the loop; wells created before it stay.
    pub async fn create_plate(&self, name: &str, rows: u32, columns: u32) -> ClientResult<Plate> {
        let mut plate = Plate::new();
        plate.set("name", name);
        plate.set("rows", rows);
        plate.set("columns", columns);
        plate.set("image_params", default_image_params());

        if !self.backend.spawn(&mut plate).await?.is_confirmed() {
            warn!("Plate {name} was not confirmed by the backend; skipping wells");
            return Ok(plate);
        }
        let Some(plate_id) = plate.id.clone() else {
            return Ok(plate);
        };

        if plate.relation_ids("wells").is_empty() {
            let plate_name = plate.name().unwrap_or(name).to_string();
            debug!(
                "Creating {} wells for plate {plate_name}",
                well_count(rows, columns)
            );

            for row in 1..=rows {
                for column in 1..=columns {
                    let mut well = Well::new();
                    well.set("name", format!("{plate_name}_well_{row}{column}"));
                    well.set("position_index", format!("{row}{column}"));
                    well.set("plate", plate_id.to_value());
                    let outcome = self.backend.spawn(&mut well).await?;
                    if !outcome.is_confirmed() {
                        warn!("Well {row}{column} of plate {plate_name} was not confirmed");
                    }
                }
            }
        }

        self.backend.pull(&mut plate).await?;
        Ok(plate)
    }

    /// Lists every record in `collection` as received, for selection lists.
    pub async fn list_objects(
        &self,
        collection: impl Into<Collection>,
    ) -> ClientResult<Vec<Value>> {
        self.backend.list_objects(&collection.into()).await
    }
}

/// Number of wells in a `rows` x `columns` grid, widened so large grids cannot overflow.
fn well_count(rows: u32, columns: u32) -> u64 {
    u64::from(rows) * u64::from(columns)
}
