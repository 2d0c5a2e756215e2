use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

/// Request headers as (name, value) pairs
pub type Headers = Vec<(String, String)>;

/// Body of a submit call
#[derive(Debug, Clone)]
pub enum Payload {
    /// Raw bytes sent as `application/octet-stream`
    Bytes(Bytes),
    /// JSON document
    Json(Value),
}

/// Raw result of a status fetch. Only produced for 2xx responses.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait CapabilityClient: Send + Sync {
    /// POST `payload` to `endpoint` and return the response body.
    ///
    /// Non-JSON bodies are passed through as `Value::String`.
    async fn submit(
        &self,
        endpoint: &str,
        payload: Payload,
        headers: &Headers,
    ) -> Result<Value, TransportError>;

    /// GET `{endpoint}/{id}`
    async fn fetch_status(
        &self,
        endpoint: &str,
        id: &str,
        headers: &Headers,
    ) -> Result<StatusResponse, TransportError>;
}
