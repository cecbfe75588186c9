//! Client for the Shadows backend.
//!
//! Maps remote records (devices, experiments, plates, wells, samples) onto
//! local [`Entity`] values and keeps them in sync over a Strapi-style REST API.
//!
//! - [`Credentials`] — endpoint and token from the `[strapi]` INI section
//! - [`Transport`] / [`HttpTransport`] — bearer-authenticated JSON exchange
//! - [`Backend`] — `spawn` (find-or-create by name), `push`, `pull`, `list_objects`
//! - [`Device`], [`Experiment`], [`Plate`], [`Well`], [`Sample`] — typed entities
//!   with append-only relationship mutators
//! - [`DatabaseInteractor`] — creation flows, including a plate's well grid
//!
//! Every call is one awaited request (two for `spawn`). Nothing is retried,
//! and the lookup-then-insert in `spawn` is not atomic.

mod backend;
mod config;
mod credentials;
mod error;
mod interactor;
mod routes;
mod variants;

pub mod transport;

pub use backend::{Backend, SpawnOutcome};
pub use config::ClientConfig;
pub use credentials::{Credentials, DEFAULT_SECTION};
pub use error::{ClientError, ClientResult};
pub use interactor::{DatabaseInteractor, default_image_params};
pub use routes::Routes;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
pub use variants::{Device, Experiment, Plate, Sample, Well};

pub use shadows_model::{Attributes, Collection, Entity, RecordId};
