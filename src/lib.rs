pub mod analysis;
pub mod capability;
pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod submission;
pub mod transcription;

pub use analysis::{AnalysisAdapter, AnalysisError, AnalysisResult};
pub use capability::{CapabilityClient, HttpCapabilityClient, MockCapabilityClient};
pub use config::Config;
pub use error::{ClipError, FailureKind, FailureReason, TransportError};
pub use http::{create_router, AppState};
pub use jobs::{JobHandle, JobState, PollPolicy, PollingJobTracker, RemoteJob};
pub use submission::{Clip, SubmissionOrchestrator, SubmissionOutcome};
pub use transcription::{TranscriptionAdapter, TranscriptionResult};
