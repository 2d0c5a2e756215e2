use super::client::{CapabilityClient, Headers, Payload, StatusResponse};
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// `CapabilityClient` backed by a reqwest connection pool
#[derive(Clone)]
pub struct HttpCapabilityClient {
    client: reqwest::Client,
}

impl HttpCapabilityClient {
    /// Create a client that gives up on connection setup after
    /// `connect_timeout`. There is no total request timeout: callers bound
    /// each call with their own path budget.
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn apply_headers(
        mut request: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }

    async fn read_response(response: reqwest::Response) -> Result<(u16, Value), TransportError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            return Err(TransportError::http(status.as_u16(), text));
        }

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok((status.as_u16(), body))
    }
}

#[async_trait]
impl CapabilityClient for HttpCapabilityClient {
    async fn submit(
        &self,
        endpoint: &str,
        payload: Payload,
        headers: &Headers,
    ) -> Result<Value, TransportError> {
        let request = match payload {
            Payload::Bytes(bytes) => {
                debug!(endpoint, bytes = bytes.len(), "Submitting raw payload");
                self.client
                    .post(endpoint)
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                    .body(bytes)
            }
            Payload::Json(json) => {
                debug!(endpoint, "Submitting JSON payload");
                self.client.post(endpoint).json(&json)
            }
        };

        let response = Self::apply_headers(request, headers)
            .send()
            .await
            .map_err(|e| TransportError::network(format!("request to {} failed: {}", endpoint, e)))?;

        let (_, body) = Self::read_response(response).await?;
        Ok(body)
    }

    async fn fetch_status(
        &self,
        endpoint: &str,
        id: &str,
        headers: &Headers,
    ) -> Result<StatusResponse, TransportError> {
        let url = format!("{}/{}", endpoint.trim_end_matches('/'), id);
        debug!(url = %url, "Fetching job status");

        let response = Self::apply_headers(self.client.get(&url), headers)
            .send()
            .await
            .map_err(|e| TransportError::network(format!("request to {} failed: {}", url, e)))?;

        let (status, body) = Self::read_response(response).await?;
        Ok(StatusResponse { status, body })
    }
}
