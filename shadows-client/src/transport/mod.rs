//! Transport abstraction.
//!
//! The client only needs one primitive: send a JSON request with a bearer
//! token and get back a status code and a JSON body. [`HttpTransport`] does
//! that over `reqwest`; tests plug in in-memory implementations.

pub mod http;

pub use http::HttpTransport;

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// The HTTP methods the backend protocol uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Sent as `Authorization: Bearer {token}`.
    pub token: String,
    pub body: Option<Value>,
}

/// The backend's answer, with the body already parsed.
///
/// A body that is not JSON is kept as a JSON string so error messages can
/// still show it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx response into [`ClientError::Api`].
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let body = match &self.body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Err(ClientError::Api {
            status: self.status,
            body,
        })
    }

    /// Takes the top-level `data` field every backend response carries.
    pub fn into_data(self) -> ClientResult<Value> {
        match self.body {
            Value::Object(mut map) => map.remove("data").ok_or_else(|| {
                ClientError::MalformedResponse("response has no data field".to_string())
            }),
            other => Err(ClientError::MalformedResponse(format!(
                "response body is not an object: {other}"
            ))),
        }
    }
}

/// Abstract request/response exchange with the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Sends `request` and returns whatever the backend answered.
    ///
    /// Only failures to exchange at all are errors here; a non-2xx status is
    /// a successful exchange.
    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse>;
}
