//! Entity synchronization: spawn, push, pull, list.
//!
//! [`Backend`] is the capability every entity variant shares. It owns the
//! transport state (endpoint, token, HTTP client) so entities carry only
//! their collection, id and attributes.
//!
//! Wire conventions:
//! - lookup: `GET {endpoint}/{collection}?filters[name][$eq]={name}&populate=*`
//! - insert: `POST {endpoint}/{collection}?populate=*` with `{"data": attributes}`
//! - update: `PUT {endpoint}/{collection}/{id}?populate=*` with `{"data": attributes}`
//! - read: `GET {endpoint}/{collection}/{id}?populate=*`
//! - listing: `GET {endpoint}/{collection}?populate=*`

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{ClientError, ClientResult};
use crate::routes::Routes;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
use serde_json::{Value, json};
use shadows_model::{Collection, Entity, RawRecord, RecordId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What `spawn` ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// No record had this name; one was inserted.
    Created,
    /// A record with this name already existed and was adopted.
    Matched,
    /// The backend answered without a usable record; `id` was left untouched.
    Unconfirmed { reason: String },
}

impl SpawnOutcome {
    /// True if the entity now mirrors a remote record.
    pub fn is_confirmed(&self) -> bool {
        !matches!(self, SpawnOutcome::Unconfirmed { .. })
    }

    pub fn already_existed(&self) -> bool {
        matches!(self, SpawnOutcome::Matched)
    }
}

/// Connection to one backend endpoint.
#[derive(Clone)]
pub struct Backend {
    routes: Routes,
    token: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("endpoint", &self.routes.endpoint())
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// Connects over HTTP using `config`.
    pub fn new(credentials: &Credentials, config: &ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    /// Uses a caller-supplied transport.
    pub fn with_transport(
        credentials: &Credentials,
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            routes: Routes::new(&credentials.endpoint, config),
            token: credentials.api_key.clone(),
            transport,
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Sends one request and fails on a non-2xx status.
    async fn exchange(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> ClientResult<ApiResponse> {
        let request = ApiRequest {
            method,
            url,
            token: self.token.clone(),
            body,
        };
        self.transport.send(request).await?.error_for_status()
    }

    /// Sends one request and returns the `data` field of a 2xx response.
    async fn request(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        self.exchange(method, url, body).await?.into_data()
    }

    /// Finds the record named like `entity`, or inserts `entity` if there is none.
    ///
    /// Requires the lookup attribute (`name` by default). On a match, the
    /// first record wins and replaces the local attributes. A response that
    /// does not contain a usable record is reported as
    /// [`SpawnOutcome::Unconfirmed`] and leaves the entity as it was; check
    /// [`SpawnOutcome::is_confirmed`] or `entity.id` afterwards.
    pub async fn spawn(&self, entity: &mut Entity) -> ClientResult<SpawnOutcome> {
        let collection = entity.collection().clone();
        let name = entity
            .get_str(self.routes.lookup_field())
            .map(str::to_string)
            .ok_or_else(|| ClientError::MissingName {
                collection: collection.to_string(),
            })?;

        let found = self
            .request(Method::Get, self.routes.lookup(&collection, &name), None)
            .await?;
        let matches = found.as_array().ok_or_else(|| {
            ClientError::MalformedResponse(format!("lookup data is not a list: {found}"))
        })?;

        if let Some(existing) = matches.first() {
            info!("{collection} object already exists: {name}");
            if matches.len() > 1 {
                debug!(
                    "{} {collection} records share the name {name}; using the first",
                    matches.len()
                );
            }
            return Ok(Self::adopt(entity, existing));
        }

        let payload = json!({ "data": entity.attributes });
        let response = self
            .exchange(Method::Post, self.routes.collection(&collection), Some(payload))
            .await?;
        let created = match response.into_data() {
            Ok(data) => data,
            Err(e) => {
                warn!("{collection} insert for {name} was not confirmed: {e}");
                return Ok(SpawnOutcome::Unconfirmed {
                    reason: e.to_string(),
                });
            }
        };

        let outcome = Self::adopt(entity, &created);
        if outcome.is_confirmed() {
            info!("Created {collection} object {name}");
            Ok(SpawnOutcome::Created)
        } else {
            Ok(outcome)
        }
    }

    fn adopt(entity: &mut Entity, raw: &Value) -> SpawnOutcome {
        match entity.parse_response(raw) {
            Ok(()) => SpawnOutcome::Matched,
            Err(e) => {
                warn!("{} record could not be adopted: {e}", entity.collection());
                SpawnOutcome::Unconfirmed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Overwrites the remote record with the local attributes, then adopts
    /// the backend's view of it.
    ///
    /// The whole attribute map is sent every time. The backend keeps fields
    /// that are absent from the body, so a push never deletes a remote field.
    pub async fn push(&self, entity: &mut Entity) -> ClientResult<()> {
        let id = Self::require_id(entity)?;
        let payload = json!({ "data": entity.attributes });
        let updated = self
            .request(
                Method::Put,
                self.routes.record(entity.collection(), &id),
                Some(payload),
            )
            .await?;
        Self::refresh(entity, &id, &updated)
    }

    /// Replaces the local attributes with the remote record. Unsaved local
    /// changes are discarded.
    pub async fn pull(&self, entity: &mut Entity) -> ClientResult<()> {
        let id = Self::require_id(entity)?;
        let current = self
            .request(Method::Get, self.routes.record(entity.collection(), &id), None)
            .await?;
        Self::refresh(entity, &id, &current)
    }

    fn refresh(entity: &mut Entity, id: &RecordId, raw: &Value) -> ClientResult<()> {
        let record = RawRecord::from_value(raw)?.normalized();
        if &record.id != id {
            warn!(
                "{} {id}: backend answered with record {}; keeping local id",
                entity.collection(),
                record.id
            );
        }
        entity.attributes = record.attributes;
        Ok(())
    }

    /// Lists every record in `collection`, relations expanded, exactly as received.
    pub async fn list_objects(&self, collection: &Collection) -> ClientResult<Vec<Value>> {
        match self
            .request(Method::Get, self.routes.collection(collection), None)
            .await?
        {
            Value::Array(records) => Ok(records),
            other => Err(ClientError::MalformedResponse(format!(
                "listing data is not a list: {other}"
            ))),
        }
    }

    pub(crate) fn require_id(entity: &Entity) -> ClientResult<RecordId> {
        entity.id.clone().ok_or_else(|| ClientError::MissingId {
            collection: entity.collection().to_string(),
        })
    }
}
