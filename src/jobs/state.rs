use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Lifecycle state of a remote job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Completed,
    Failed,
    TimedOut,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobErrorKind {
    /// Submission never reached the service
    Transport,
    /// The service reported the job as failed
    ServiceReported,
    /// Wait budget exhausted while still pending
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobError {
    pub kind: JobErrorKind,
    pub message: String,
}

impl JobError {
    pub fn new(kind: JobErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Status flags observed in a single status response.
///
/// A response may raise both flags; `resolve` applies the precedence
/// Failed > Completed > Pending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusReport {
    pub completed: bool,
    pub failed: bool,
    pub detail: Option<String>,
}

impl StatusReport {
    pub fn resolve(&self) -> JobState {
        if self.failed {
            JobState::Failed
        } else if self.completed {
            JobState::Completed
        } else {
            JobState::Pending
        }
    }
}

/// A job tracked on an external service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteJob {
    job_id: Option<String>,
    submitted_at: DateTime<Utc>,
    state: JobState,
    result: Option<Value>,
    error: Option<JobError>,
}

impl RemoteJob {
    pub(crate) fn pending(job_id: String) -> Self {
        Self {
            job_id: Some(job_id),
            submitted_at: Utc::now(),
            state: JobState::Pending,
            result: None,
            error: None,
        }
    }

    /// A job whose submission failed; it never received an id
    pub(crate) fn rejected(error: JobError) -> Self {
        Self {
            job_id: None,
            submitted_at: Utc::now(),
            state: JobState::Failed,
            result: None,
            error: Some(error),
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&JobError> {
        self.error.as_ref()
    }

    pub(crate) fn complete(&mut self, body: Value) -> bool {
        if !self.transition(JobState::Completed) {
            return false;
        }
        self.result = Some(body);
        true
    }

    pub(crate) fn fail(&mut self, error: JobError) -> bool {
        let next = match error.kind {
            JobErrorKind::TimedOut => JobState::TimedOut,
            _ => JobState::Failed,
        };
        if !self.transition(next) {
            return false;
        }
        self.error = Some(error);
        true
    }

    fn transition(&mut self, next: JobState) -> bool {
        if self.state.is_terminal() {
            warn!(
                job_id = ?self.job_id,
                from = ?self.state,
                to = ?next,
                "Ignoring transition out of terminal state"
            );
            return false;
        }
        self.state = next;
        true
    }
}
