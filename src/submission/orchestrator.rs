use super::clip::Clip;
use super::outcome::SubmissionOutcome;
use crate::analysis::AnalysisAdapter;
use crate::capability::CapabilityClient;
use crate::config::Config;
use crate::error::{ClipError, FailureReason};
use crate::transcription::TranscriptionAdapter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Fans one clip out to both analysis paths and merges their results
pub struct SubmissionOrchestrator {
    transcription: TranscriptionAdapter,
    analysis: AnalysisAdapter,
}

impl SubmissionOrchestrator {
    pub fn new(transcription: TranscriptionAdapter, analysis: AnalysisAdapter) -> Self {
        Self {
            transcription,
            analysis,
        }
    }

    /// Build both adapters on a shared capability client
    pub fn from_config(client: Arc<dyn CapabilityClient>, config: &Config) -> Self {
        Self::new(
            TranscriptionAdapter::new(Arc::clone(&client), &config.transcription),
            AnalysisAdapter::new(client, &config.analysis),
        )
    }

    /// Upper bound on `submit` latency: the slower path's own budget
    pub fn max_latency(&self) -> Duration {
        self.transcription
            .policy()
            .max_wait
            .max(self.analysis.timeout())
    }

    /// Analyze one clip.
    ///
    /// Only clip validation fails the call as a whole; every later failure is
    /// recorded in its slot of the outcome. Both paths run concurrently on the
    /// caller's task, so dropping the returned future stops all in-flight
    /// requests and pending poll timers.
    pub async fn submit(&self, clip: Clip) -> Result<SubmissionOutcome, ClipError> {
        if let Err(e) = clip.validate() {
            warn!(mime_type = clip.mime_type(), error = %e, "Rejecting clip");
            return Err(e);
        }

        let submission_id = Uuid::new_v4();
        let span = info_span!("submission", %submission_id);

        async move {
            info!(
                mime_type = clip.mime_type(),
                bytes = clip.len(),
                "Submission started"
            );

            let (transcription, analysis) = tokio::join!(
                self.transcription.transcribe(&clip),
                async { self.analysis.analyze(&clip).await.map_err(FailureReason::from) },
            );

            if let Err(reason) = &transcription {
                warn!(reason = %reason, "Transcription path failed");
            }
            if let Err(reason) = &analysis {
                warn!(reason = %reason, "Analysis path failed");
            }

            let outcome = SubmissionOutcome {
                submission_id,
                transcription,
                analysis,
            };

            info!(
                complete = outcome.is_complete(),
                partial = outcome.is_partial(),
                "Submission finished"
            );

            Ok(outcome)
        }
        .instrument(span)
        .await
    }
}
