//! HTTP seam between the workflows and the review backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::ApiErrorBody;
use tracing::debug;

use crate::error::TransportError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:6543/api";

/// Status and raw body of a completed exchange. Interpreting either is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }

    pub fn error_message(&self) -> Option<String> {
        ApiErrorBody::message_from_body(&self.body)
    }
}

#[async_trait]
pub trait ReviewTransport: Send + Sync {
    async fn post_json(&self, path: &str, body: Value)
        -> Result<TransportResponse, TransportError>;
    async fn get_json(&self, path: &str) -> Result<TransportResponse, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

async fn read_response(response: reqwest::Response) -> Result<TransportResponse, TransportError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    debug!(status, bytes = body.len(), "received backend response");
    Ok(TransportResponse { status, body })
}

#[async_trait]
impl ReviewTransport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: Value,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.endpoint(path);
        debug!(%url, "POST");
        let response = self.http.post(&url).json(&body).send().await?;
        read_response(response).await
    }

    async fn get_json(&self, path: &str) -> Result<TransportResponse, TransportError> {
        let url = self.endpoint(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        read_response(response).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
