use super::messages::{Content, GenerateRequest, GenerateResponse, GenerationConfig, InlineData, Part};
use super::prompt::build_prompt;
use super::result::AnalysisResult;
use crate::capability::{CapabilityClient, Headers, Payload};
use crate::config::AnalysisConfig;
use crate::error::{FailureKind, FailureReason, TransportError};
use crate::submission::Clip;
use base64::Engine;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Media types the generative model accepts inline
const SUPPORTED_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/mpeg",
    "video/mov",
    "video/quicktime",
    "video/avi",
    "video/x-msvideo",
    "video/x-flv",
    "video/mpg",
    "video/webm",
    "video/wmv",
    "video/3gpp",
    "audio/wav",
    "audio/x-wav",
    "audio/mp3",
    "audio/mpeg",
    "audio/aiff",
    "audio/aac",
    "audio/ogg",
    "audio/flac",
];

pub fn is_supported_mime(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("model refused the request: {0}")]
    ServiceFailure(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("invalid analysis: {0}")]
    Validation(String),
}

impl From<AnalysisError> for FailureReason {
    fn from(err: AnalysisError) -> Self {
        let kind = match &err {
            AnalysisError::UnsupportedMedia(_) => FailureKind::UnsupportedMediaError,
            AnalysisError::Transport(_) => FailureKind::TransportError,
            AnalysisError::ServiceFailure(_) => FailureKind::ServiceFailure,
            AnalysisError::Timeout(_) => FailureKind::Timeout,
            AnalysisError::Validation(_) => FailureKind::ValidationError,
        };
        FailureReason::new(kind, err.to_string())
    }
}

/// Find the `AnalysisResult` document inside free model text.
///
/// Each `{` is tried in order as the start of a JSON value, so prose or
/// markdown fences around the document are skipped even when the prose has
/// braces of its own. When no candidate has the right shape, the error from
/// the first complete object wins.
pub fn extract_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let mut shape_error = None;

    for (start, _) in text.match_indices('{') {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        let value = match values.next() {
            Some(Ok(value)) if value.is_object() => value,
            _ => continue,
        };

        match serde_json::from_value::<AnalysisResult>(value) {
            Ok(result) => return Ok(result),
            Err(e) => {
                shape_error.get_or_insert(e);
            }
        }
    }

    Err(AnalysisError::Validation(match shape_error {
        Some(e) => e.to_string(),
        None => "no JSON object in response".to_string(),
    }))
}

/// Requests structured feedback on a clip in one round trip
pub struct AnalysisAdapter {
    client: Arc<dyn CapabilityClient>,
    endpoint: String,
    headers: Headers,
    question: String,
    timeout: Duration,
}

impl AnalysisAdapter {
    pub fn new(client: Arc<dyn CapabilityClient>, config: &AnalysisConfig) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Self {
            client,
            endpoint,
            headers: vec![("x-goog-api-key".to_string(), config.api_key.clone())],
            question: config.question.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn analyze(&self, clip: &Clip) -> Result<AnalysisResult, AnalysisError> {
        let kind = match clip.media_kind() {
            Some(kind) if is_supported_mime(clip.mime_type()) => kind,
            _ => {
                warn!(mime_type = clip.mime_type(), "Rejecting clip for analysis");
                return Err(AnalysisError::UnsupportedMedia(clip.mime_type().to_string()));
            }
        };

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: build_prompt(&self.question, kind),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: clip.mime_type().to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(clip.data()),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };
        let payload = serde_json::to_value(&request)
            .map_err(|e| AnalysisError::Validation(format!("encode request: {}", e)))?;

        debug!(mime_type = clip.mime_type(), bytes = clip.len(), "Requesting analysis");

        let call = self.client.submit(&self.endpoint, Payload::Json(payload), &self.headers);
        let body = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AnalysisError::Timeout(self.timeout))??;

        let response: GenerateResponse = serde_json::from_value(body)
            .map_err(|e| AnalysisError::Validation(format!("unexpected response shape: {}", e)))?;

        let result = Self::parse(&response)?;
        info!("Analysis completed");
        Ok(result)
    }

    fn parse(response: &GenerateResponse) -> Result<AnalysisResult, AnalysisError> {
        let text = match response.text() {
            Some(text) => text,
            None => {
                return Err(match response.block_reason() {
                    Some(reason) => AnalysisError::ServiceFailure(format!("blocked: {}", reason)),
                    None => AnalysisError::Validation("response contained no text".to_string()),
                })
            }
        };

        extract_analysis(&text)
    }
}
