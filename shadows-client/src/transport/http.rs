//! `reqwest`-backed transport.

use super::{ApiRequest, ApiResponse, Method, Transport};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Sends requests over HTTP(S) with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the timeout and user agent from `config`.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an already-configured `reqwest` client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, request: ApiRequest) -> ClientResult<ApiResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
        }
        .bearer_auth(&request.token);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            parsed.unwrap_or(Value::String(text))
        };

        debug!("{} {} -> {}", request.method, request.url, status);
        Ok(ApiResponse { status, body })
    }
}
