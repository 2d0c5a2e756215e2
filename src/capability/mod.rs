//! Transport to external analysis services
//!
//! A `CapabilityClient` performs exactly one network call per invocation and
//! never interprets job status semantics:
//! - `submit` - POST a payload, return the raw response body
//! - `fetch_status` - GET `{endpoint}/{id}`, return status code and raw body
//!
//! Retry policy lives in the job tracker, not here.

mod client;
mod http;
mod mock;

pub use client::{CapabilityClient, Headers, Payload, StatusResponse};
pub use http::HttpCapabilityClient;
pub use mock::{MockCapabilityClient, RecordedCall};
