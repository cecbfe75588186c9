//! Client configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the HTTP client and the URLs it builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overall per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Value of the `populate` query parameter; `*` expands every relation.
    pub populate: String,
    /// Attribute that `spawn` looks existing records up by.
    pub lookup_field: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            user_agent: concat!("shadows/", env!("CARGO_PKG_VERSION")).to_string(),
            populate: "*".to_string(),
            lookup_field: "name".to_string(),
        }
    }
}
