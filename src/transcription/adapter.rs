use super::messages::{TranscriptRequest, TranscriptStatusMessage, UploadResponse};
use super::result::{Sentiment, SentimentSegment, TranscriptionResult};
use crate::capability::{CapabilityClient, Headers, Payload};
use crate::config::TranscriptionConfig;
use crate::error::{FailureKind, FailureReason};
use crate::jobs::{
    JobEndpoint, JobErrorKind, JobState, PollPolicy, PollingJobTracker, RemoteJob, StatusReport,
};
use crate::submission::Clip;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Read status flags from a `GET /transcript/{id}` body.
///
/// A non-null `error` field raises the failure flag even when `status`
/// claims completion.
pub fn classify_transcript_status(body: &Value) -> StatusReport {
    let status = body.get("status").and_then(Value::as_str).unwrap_or_default();
    let error = body
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty());

    let failed = matches!(status, "error" | "failed") || error.is_some();
    let detail = match error {
        Some(message) => Some(message.to_string()),
        None if failed => Some(format!("transcription job reported status '{}'", status)),
        None => None,
    };

    StatusReport {
        completed: status == "completed",
        failed,
        detail,
    }
}

/// Runs one transcription job per clip and normalizes its result
pub struct TranscriptionAdapter {
    client: Arc<dyn CapabilityClient>,
    upload_url: String,
    headers: Headers,
    tracker: PollingJobTracker,
    policy: PollPolicy,
}

impl TranscriptionAdapter {
    pub fn new(client: Arc<dyn CapabilityClient>, config: &TranscriptionConfig) -> Self {
        let base_url = config.base_url.trim_end_matches('/');
        let headers = vec![("authorization".to_string(), config.api_key.clone())];

        let tracker = PollingJobTracker::new(
            Arc::clone(&client),
            JobEndpoint {
                submit_url: format!("{}/transcript", base_url),
                status_url: format!("{}/transcript", base_url),
                headers: headers.clone(),
            },
            classify_transcript_status,
        );

        Self {
            client,
            upload_url: format!("{}/upload", base_url),
            headers,
            tracker,
            policy: config.poll_policy(),
        }
    }

    /// Wait budget for one call to `transcribe`
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Upload, submit and poll. The whole path, upload included, is capped
    /// at the policy's `max_wait`.
    pub async fn transcribe(&self, clip: &Clip) -> Result<TranscriptionResult, FailureReason> {
        let max_wait = self.policy.max_wait;
        tokio::time::timeout(max_wait, self.run(clip))
            .await
            .unwrap_or_else(|_| {
                warn!(max_wait_ms = max_wait.as_millis() as u64, "Transcription path timed out");
                Err(FailureReason::new(
                    FailureKind::Timeout,
                    format!("no transcript within {} ms", max_wait.as_millis()),
                ))
            })
    }

    async fn run(&self, clip: &Clip) -> Result<TranscriptionResult, FailureReason> {
        let audio_url = self.upload(clip).await?;

        let request = TranscriptRequest {
            audio_url,
            sentiment_analysis: true,
        };
        let payload = serde_json::to_value(&request).map_err(|e| {
            FailureReason::new(FailureKind::ValidationError, format!("encode request: {}", e))
        })?;

        let mut handle = self.tracker.start(Payload::Json(payload)).await;
        let job = self.tracker.await_result(&mut handle, self.policy).await;

        Self::into_result(job)
    }

    async fn upload(&self, clip: &Clip) -> Result<String, FailureReason> {
        let body = self
            .client
            .submit(&self.upload_url, Payload::Bytes(clip.data().clone()), &self.headers)
            .await?;

        let upload: UploadResponse = serde_json::from_value(body).map_err(|e| {
            warn!(error = %e, "Upload response missing upload_url");
            FailureReason::new(
                FailureKind::ServiceFailure,
                format!("upload response missing upload_url: {}", e),
            )
        })?;

        info!(bytes = clip.len(), "Clip uploaded for transcription");
        Ok(upload.upload_url)
    }

    fn into_result(job: RemoteJob) -> Result<TranscriptionResult, FailureReason> {
        match job.state() {
            JobState::Completed => {
                let body = job.result().cloned().unwrap_or(Value::Null);
                normalize(body)
            }
            JobState::Failed => {
                let (kind, detail) = match job.error() {
                    Some(error) if error.kind == JobErrorKind::Transport => {
                        (FailureKind::TransportError, error.message.clone())
                    }
                    Some(error) => (FailureKind::ServiceFailure, error.message.clone()),
                    None => (FailureKind::ServiceFailure, "transcription failed".to_string()),
                };
                Err(FailureReason::new(kind, detail))
            }
            JobState::TimedOut | JobState::Pending => {
                let detail = job
                    .error()
                    .map(|error| error.message.clone())
                    .unwrap_or_else(|| "transcription did not finish".to_string());
                Err(FailureReason::new(FailureKind::Timeout, detail))
            }
        }
    }
}

/// Map a completed status body into a `TranscriptionResult`.
///
/// Missing or empty sentiment results yield an empty segment list.
fn normalize(body: Value) -> Result<TranscriptionResult, FailureReason> {
    let message: TranscriptStatusMessage = serde_json::from_value(body).map_err(|e| {
        FailureReason::new(
            FailureKind::ValidationError,
            format!("malformed transcript: {}", e),
        )
    })?;

    let sentiment_segments = message
        .sentiment_analysis_results
        .unwrap_or_default()
        .into_iter()
        .map(|result| {
            let sentiment = Sentiment::from_label(&result.sentiment).ok_or_else(|| {
                FailureReason::new(
                    FailureKind::ValidationError,
                    format!("unknown sentiment label '{}'", result.sentiment),
                )
            })?;
            Ok(SentimentSegment {
                text: result.text,
                sentiment,
                confidence: result.confidence,
                start_ms: result.start,
                end_ms: result.end,
            })
        })
        .collect::<Result<Vec<_>, FailureReason>>()?;

    Ok(TranscriptionResult {
        text: message.text.unwrap_or_default(),
        sentiment_segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::MockCapabilityClient;
    use crate::error::TransportError;
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "https://transcribe.test/v2";
    const UPLOAD: &str = "https://transcribe.test/v2/upload";
    const TRANSCRIPT: &str = "https://transcribe.test/v2/transcript";

    fn config() -> TranscriptionConfig {
        TranscriptionConfig {
            base_url: BASE.to_string(),
            api_key: "test-key".to_string(),
            poll_interval_ms: 1000,
            timeout_ms: 10_000,
        }
    }

    fn clip() -> Clip {
        Clip::new(vec![7u8; 64], "audio/webm")
    }

    fn scripted() -> MockCapabilityClient {
        MockCapabilityClient::new()
            .on_submit(UPLOAD, Ok(json!({"upload_url": "https://cdn.test/clip"})))
            .on_submit(TRANSCRIPT, Ok(json!({"id": "tx-1", "status": "queued"})))
    }

    #[test]
    fn test_classify_completed() {
        let report = classify_transcript_status(&json!({"status": "completed", "error": null}));
        assert_eq!(report.resolve(), JobState::Completed);
    }

    #[test]
    fn test_classify_processing_is_pending() {
        let report = classify_transcript_status(&json!({"status": "processing"}));
        assert_eq!(report.resolve(), JobState::Pending);
    }

    #[test]
    fn test_classify_completed_with_error_is_failed() {
        let report = classify_transcript_status(&json!({
            "status": "completed",
            "error": "audio too short"
        }));
        assert_eq!(report.resolve(), JobState::Failed);
        assert_eq!(report.detail.as_deref(), Some("audio too short"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_transcript_maps_segments() {
        let mock = Arc::new(
            scripted()
                .on_status(TRANSCRIPT, Ok(json!({"status": "processing"})))
                .on_status(
                    TRANSCRIPT,
                    Ok(json!({
                        "id": "tx-1",
                        "status": "completed",
                        "text": "I build distributed systems. I enjoy it.",
                        "sentiment_analysis_results": [
                            {"text": "I build distributed systems.", "sentiment": "NEUTRAL", "confidence": 0.81, "start": 0, "end": 1800},
                            {"text": "I enjoy it.", "sentiment": "POSITIVE", "confidence": 0.97, "start": 1900, "end": 2600}
                        ]
                    })),
                ),
        );
        let adapter = TranscriptionAdapter::new(mock.clone(), &config());

        let result = adapter.transcribe(&clip()).await.unwrap();

        assert_eq!(result.text, "I build distributed systems. I enjoy it.");
        assert_eq!(result.sentiment_segments.len(), 2);
        assert_eq!(result.sentiment_segments[0].sentiment, Sentiment::Neutral);
        assert_eq!(result.sentiment_segments[1].sentiment, Sentiment::Positive);
        assert_eq!(result.sentiment_segments[1].start_ms, Some(1900));

        let polls = mock.calls_to(TRANSCRIPT);
        // One submit, two status checks
        assert_eq!(polls.len(), 3);
        assert_eq!(polls[1].id.as_deref(), Some("tx-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_sentiment_results_is_not_an_error() {
        let mock = Arc::new(scripted().on_status(
            TRANSCRIPT,
            Ok(json!({"status": "completed", "text": "", "sentiment_analysis_results": []})),
        ));
        let adapter = TranscriptionAdapter::new(mock, &config());

        let result = adapter.transcribe(&clip()).await.unwrap();

        assert!(result.sentiment_segments.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_sentiment_results_is_not_an_error() {
        let mock = Arc::new(scripted().on_status(
            TRANSCRIPT,
            Ok(json!({"status": "completed", "text": "hello", "sentiment_analysis_results": null})),
        ));
        let adapter = TranscriptionAdapter::new(mock, &config());

        let result = adapter.transcribe(&clip()).await.unwrap();

        assert_eq!(result.text, "hello");
        assert!(result.sentiment_segments.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_error_is_service_failure() {
        let mock = Arc::new(scripted().on_status(
            TRANSCRIPT,
            Ok(json!({"status": "error", "error": "unsupported codec"})),
        ));
        let adapter = TranscriptionAdapter::new(mock, &config());

        let reason = adapter.transcribe(&clip()).await.unwrap_err();

        assert_eq!(reason.kind, FailureKind::ServiceFailure);
        assert_eq!(reason.detail, "unsupported codec");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_forever_is_timeout() {
        let mock = Arc::new(scripted().on_status(TRANSCRIPT, Ok(json!({"status": "queued"}))));
        let adapter = TranscriptionAdapter::new(mock, &config());

        let begin = tokio::time::Instant::now();
        let reason = adapter.transcribe(&clip()).await.unwrap_err();

        assert_eq!(reason.kind, FailureKind::Timeout);
        assert!(tokio::time::Instant::now() - begin < Duration::from_millis(10_100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_transport_error_skips_job() {
        let mock = Arc::new(
            MockCapabilityClient::new().on_submit(UPLOAD, Err(TransportError::http(401, "bad key"))),
        );
        let adapter = TranscriptionAdapter::new(mock.clone(), &config());

        let reason = adapter.transcribe(&clip()).await.unwrap_err();

        assert_eq!(reason.kind, FailureKind::TransportError);
        assert!(mock.calls_to(TRANSCRIPT).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_sentiment_label_is_validation_error() {
        let mock = Arc::new(scripted().on_status(
            TRANSCRIPT,
            Ok(json!({
                "status": "completed",
                "text": "hmm",
                "sentiment_analysis_results": [
                    {"text": "hmm", "sentiment": "CONFUSED", "confidence": 0.5}
                ]
            })),
        ));
        let adapter = TranscriptionAdapter::new(mock, &config());

        let reason = adapter.transcribe(&clip()).await.unwrap_err();

        assert_eq!(reason.kind, FailureKind::ValidationError);
    }
}
