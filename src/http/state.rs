use crate::submission::SubmissionOrchestrator;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SubmissionOrchestrator>,

    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(orchestrator: SubmissionOrchestrator, max_upload_bytes: usize) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            max_upload_bytes,
        }
    }
}
