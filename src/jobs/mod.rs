//! Lifecycle of asynchronous jobs on external services
//!
//! A `PollingJobTracker` submits one job and drives it to a terminal state:
//! - `start` - submit the job, yielding a `JobHandle`
//! - `await_result` - poll at a fixed interval until Completed, Failed or TimedOut
//!
//! Each `RemoteJob` is owned by exactly one `JobHandle`; state transitions are
//! monotonic and terminal states are final.

mod state;
mod tracker;

pub use state::{JobError, JobErrorKind, JobState, RemoteJob, StatusReport};
pub use tracker::{JobEndpoint, JobHandle, PollPolicy, PollingJobTracker, StatusClassifier};
