use serde::{Deserialize, Serialize};
use std::fmt;

/// Network or HTTP-level failure talking to an external service.
///
/// Never retried by the capability client itself. The job tracker decides
/// whether a transport error is fatal (submit) or transient (status poll).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("transport error{}: {message}", http_suffix(.status_code))]
pub struct TransportError {
    pub status_code: Option<u16>,
    pub message: String,
}

fn http_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| format!(" (HTTP {})", code))
        .unwrap_or_default()
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: message.into(),
        }
    }
}

/// Errors rejecting a clip before any remote call is made
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClipError {
    #[error("no clip provided")]
    Empty,
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),
}

/// Failure category recorded in one slot of a submission outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    TransportError,
    ServiceFailure,
    Timeout,
    ValidationError,
    UnsupportedMediaError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::TransportError => "TransportError",
            FailureKind::ServiceFailure => "ServiceFailure",
            FailureKind::Timeout => "Timeout",
            FailureKind::ValidationError => "ValidationError",
            FailureKind::UnsupportedMediaError => "UnsupportedMediaError",
        };
        f.write_str(name)
    }
}

/// Why one analysis path did not produce a result.
///
/// Serialized as `{"error": "<kind>", "detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReason {
    #[serde(rename = "error")]
    pub kind: FailureKind,
    pub detail: String,
}

impl FailureReason {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

impl From<TransportError> for FailureReason {
    fn from(err: TransportError) -> Self {
        FailureReason::new(FailureKind::TransportError, err.to_string())
    }
}
