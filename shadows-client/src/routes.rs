//! URL construction for the backend's REST conventions.

use crate::config::ClientConfig;
use shadows_model::{Collection, RecordId};

/// Builds every URL the client requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    endpoint: String,
    populate: String,
    lookup_field: String,
}

impl Routes {
    pub fn new(endpoint: &str, config: &ClientConfig) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            populate: config.populate.clone(),
            lookup_field: config.lookup_field.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn lookup_field(&self) -> &str {
        &self.lookup_field
    }

    /// `GET {endpoint}/{collection}?filters[name][$eq]={value}&populate=*`
    pub fn lookup(&self, collection: &Collection, value: &str) -> String {
        format!(
            "{}/{}?filters[{}][$eq]={}&populate={}",
            self.endpoint,
            collection,
            self.lookup_field,
            urlencoding::encode(value),
            self.populate
        )
    }

    /// Collection URL, used for inserts and listings.
    pub fn collection(&self, collection: &Collection) -> String {
        format!("{}/{}?populate={}", self.endpoint, collection, self.populate)
    }

    /// Record URL, used for reads and updates.
    pub fn record(&self, collection: &Collection, id: &RecordId) -> String {
        format!(
            "{}/{}/{}?populate={}",
            self.endpoint,
            collection,
            urlencoding::encode(&id.to_string()),
            self.populate
        )
    }
}
