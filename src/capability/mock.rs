use super::client::{CapabilityClient, Headers, Payload, StatusResponse};
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

type Scripted = Result<Value, TransportError>;

/// One call observed by `MockCapabilityClient`
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    /// Job id for status fetches, `None` for submits
    pub id: Option<String>,
    pub payload: Option<Payload>,
    pub at: Instant,
}

/// Scripted in-memory `CapabilityClient`.
///
/// Responses are queued per endpoint and consumed in order; the last queued
/// response repeats forever. Unscripted endpoints fail with a transport error.
#[derive(Default)]
pub struct MockCapabilityClient {
    submit_routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    status_routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    latency: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn next_response(routes: &Mutex<HashMap<String, VecDeque<Scripted>>>, endpoint: &str) -> Scripted {
    let mut routes = lock(routes);
    match routes.get_mut(endpoint) {
        Some(queue) if queue.len() > 1 => queue
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("empty script"))),
        Some(queue) => queue
            .front()
            .cloned()
            .unwrap_or_else(|| Err(TransportError::network("empty script"))),
        None => Err(TransportError::network(format!(
            "no scripted response for {}",
            endpoint
        ))),
    }
}

impl MockCapabilityClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `submit(endpoint, ..)`
    pub fn on_submit(self, endpoint: &str, response: Scripted) -> Self {
        lock(&self.submit_routes)
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a body (or error) for `fetch_status(endpoint, ..)`
    pub fn on_status(self, endpoint: &str, response: Scripted) -> Self {
        lock(&self.status_routes)
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Delay every call to `endpoint` by `delay`
    pub fn with_latency(self, endpoint: &str, delay: Duration) -> Self {
        lock(&self.latency).insert(endpoint.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    async fn record(&self, endpoint: &str, id: Option<&str>, payload: Option<Payload>) {
        lock(&self.calls).push(RecordedCall {
            endpoint: endpoint.to_string(),
            id: id.map(str::to_string),
            payload,
            at: Instant::now(),
        });

        let delay = lock(&self.latency).get(endpoint).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl CapabilityClient for MockCapabilityClient {
    async fn submit(
        &self,
        endpoint: &str,
        payload: Payload,
        _headers: &Headers,
    ) -> Result<Value, TransportError> {
        self.record(endpoint, None, Some(payload)).await;
        next_response(&self.submit_routes, endpoint)
    }

    async fn fetch_status(
        &self,
        endpoint: &str,
        id: &str,
        _headers: &Headers,
    ) -> Result<StatusResponse, TransportError> {
        self.record(endpoint, Some(id), None).await;
        next_response(&self.status_routes, endpoint).map(|body| StatusResponse { status: 200, body })
    }
}
