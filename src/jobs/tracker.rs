use super::state::{JobError, JobErrorKind, JobState, RemoteJob, StatusReport};
use crate::capability::{CapabilityClient, Headers, Payload};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Stand-in for budgets too large to add to an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + budget`, saturating to a far-future instant instead of
/// overflowing on budgets like `Duration::MAX`
fn deadline_after(start: Instant, budget: Duration) -> Instant {
    start
        .checked_add(budget)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Maps a raw status body onto status flags
pub type StatusClassifier = fn(&Value) -> StatusReport;

/// Where a job is submitted and polled
#[derive(Debug, Clone)]
pub struct JobEndpoint {
    pub submit_url: String,
    /// Status is fetched from `{status_url}/{job_id}`
    pub status_url: String,
    pub headers: Headers,
}

/// Polling cadence and wait budget for one job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub poll_interval: Duration,
    /// Measured from submission
    pub max_wait: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(5000),
            max_wait: Duration::from_secs(300),
        }
    }
}

/// Exclusive owner of one `RemoteJob`
#[derive(Debug)]
pub struct JobHandle {
    job: RemoteJob,
    started: Instant,
    last_check: Option<Instant>,
}

impl JobHandle {
    fn new(job: RemoteJob) -> Self {
        Self {
            job,
            started: Instant::now(),
            last_check: None,
        }
    }

    pub fn job(&self) -> &RemoteJob {
        &self.job
    }

    pub fn is_terminal(&self) -> bool {
        self.job.state().is_terminal()
    }
}

/// Drives remote jobs from submission to a terminal state
pub struct PollingJobTracker {
    client: Arc<dyn CapabilityClient>,
    endpoint: JobEndpoint,
    classify: StatusClassifier,
}

impl PollingJobTracker {
    pub fn new(
        client: Arc<dyn CapabilityClient>,
        endpoint: JobEndpoint,
        classify: StatusClassifier,
    ) -> Self {
        Self {
            client,
            endpoint,
            classify,
        }
    }

    /// Submit a job. A transport failure yields an already-Failed handle.
    pub async fn start(&self, payload: Payload) -> JobHandle {
        let response = self
            .client
            .submit(&self.endpoint.submit_url, payload, &self.endpoint.headers)
            .await;

        let job = match response {
            Ok(body) => match job_id_of(&body) {
                Some(job_id) => {
                    info!(job_id = %job_id, "Remote job submitted");
                    RemoteJob::pending(job_id)
                }
                None => {
                    warn!(body = %body, "Submit response carried no job id");
                    RemoteJob::rejected(JobError::new(
                        JobErrorKind::ServiceReported,
                        "submit response carried no job id",
                    ))
                }
            },
            Err(e) => {
                warn!(error = %e, "Remote job submission failed");
                RemoteJob::rejected(JobError::new(JobErrorKind::Transport, e.to_string()))
            }
        };

        JobHandle::new(job)
    }

    /// Poll until the job reaches a terminal state or the wait budget runs out.
    ///
    /// Status checks run one at a time, at least `poll_interval` apart. A
    /// transport error on a check is retried on the next tick; a failure
    /// reported by the service is terminal. Calling this on a terminal handle
    /// returns the stored job without any network call.
    pub async fn await_result(&self, handle: &mut JobHandle, policy: PollPolicy) -> RemoteJob {
        if handle.is_terminal() {
            return handle.job.clone();
        }

        let job_id = match handle.job.job_id() {
            Some(id) => id.to_string(),
            None => {
                handle.job.fail(JobError::new(
                    JobErrorKind::ServiceReported,
                    "pending job has no id",
                ));
                return handle.job.clone();
            }
        };

        let deadline = deadline_after(handle.started, policy.max_wait);
        let mut attempts = 0u32;

        loop {
            match handle.last_check {
                Some(last) => {
                    let next = deadline_after(last, policy.poll_interval);
                    if next >= deadline {
                        tokio::time::sleep_until(deadline).await;
                        self.time_out(handle, &job_id, policy);
                        break;
                    }
                    tokio::time::sleep_until(next).await;
                }
                None if Instant::now() >= deadline => {
                    self.time_out(handle, &job_id, policy);
                    break;
                }
                None => {}
            }

            handle.last_check = Some(Instant::now());
            attempts += 1;

            let fetch = self
                .client
                .fetch_status(&self.endpoint.status_url, &job_id, &self.endpoint.headers);

            let response = match tokio::time::timeout_at(deadline, fetch).await {
                Ok(response) => response,
                Err(_) => {
                    self.time_out(handle, &job_id, policy);
                    break;
                }
            };

            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    warn!(job_id = %job_id, attempt = attempts, error = %e, "Status check failed, retrying");
                    continue;
                }
            };

            let report = (self.classify)(&response.body);
            match report.resolve() {
                JobState::Pending => {
                    debug!(job_id = %job_id, attempt = attempts, "Job still pending");
                }
                JobState::Completed => {
                    info!(job_id = %job_id, attempts, "Remote job completed");
                    handle.job.complete(response.body);
                    break;
                }
                JobState::Failed | JobState::TimedOut => {
                    let detail = report
                        .detail
                        .unwrap_or_else(|| "service reported failure".to_string());
                    warn!(job_id = %job_id, detail = %detail, "Remote job failed");
                    handle
                        .job
                        .fail(JobError::new(JobErrorKind::ServiceReported, detail));
                    break;
                }
            }
        }

        handle.job.clone()
    }

    fn time_out(&self, handle: &mut JobHandle, job_id: &str, policy: PollPolicy) {
        warn!(job_id = %job_id, max_wait_ms = policy.max_wait.as_millis() as u64, "Remote job timed out");
        handle.job.fail(JobError::new(
            JobErrorKind::TimedOut,
            format!("no terminal status within {} ms", policy.max_wait.as_millis()),
        ));
    }
}

fn job_id_of(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
