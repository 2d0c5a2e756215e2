//! One logical "analyze this clip" request
//!
//! The orchestrator validates the clip, runs the transcription and analysis
//! paths concurrently, and reports both results side by side. Either path may
//! fail without affecting the other.

mod clip;
mod orchestrator;
mod outcome;

pub use clip::{Clip, MediaKind};
pub use orchestrator::SubmissionOrchestrator;
pub use outcome::SubmissionOutcome;
