use crate::analysis::AnalysisResult;
use crate::error::FailureReason;
use crate::transcription::TranscriptionResult;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Terminal result of one submission. Each slot succeeds or fails on its own;
/// the outcome as a whole is never a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub submission_id: Uuid,
    pub transcription: Result<TranscriptionResult, FailureReason>,
    pub analysis: Result<AnalysisResult, FailureReason>,
}

impl SubmissionOutcome {
    /// Both slots succeeded
    pub fn is_complete(&self) -> bool {
        self.transcription.is_ok() && self.analysis.is_ok()
    }

    /// Exactly one slot succeeded
    pub fn is_partial(&self) -> bool {
        self.transcription.is_ok() != self.analysis.is_ok()
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Slot<'a, T> {
    Ok(&'a T),
    Err(&'a FailureReason),
}

impl<'a, T> From<&'a Result<T, FailureReason>> for Slot<'a, T> {
    fn from(result: &'a Result<T, FailureReason>) -> Self {
        match result {
            Ok(value) => Slot::Ok(value),
            Err(reason) => Slot::Err(reason),
        }
    }
}

#[derive(Serialize)]
struct OutcomeRepr<'a> {
    submission_id: &'a Uuid,
    transcription: Slot<'a, TranscriptionResult>,
    analysis: Slot<'a, AnalysisResult>,
}

impl Serialize for SubmissionOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeRepr {
            submission_id: &self.submission_id,
            transcription: Slot::from(&self.transcription),
            analysis: Slot::from(&self.analysis),
        }
        .serialize(serializer)
    }
}
