use super::state::AppState;
use crate::submission::Clip;
use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Multipart field names accepted for the clip
const CLIP_FIELDS: &[&str] = &["clip", "video", "file"];

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: String) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /clips
/// Analyze a single uploaded clip with both services
pub async fn submit_clip(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    let clip = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                warn!("Submission without a clip");
                return bad_request("No clip provided".to_string());
            }
            Err(e) => {
                error!("Failed to read multipart body: {}", e);
                return bad_request(format!("Failed to read multipart body: {}", e));
            }
        };

        if !is_clip_field(&field) {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        match field.bytes().await {
            Ok(data) => break Clip::new(data, &mime_type),
            Err(e) => {
                error!("Failed to read clip: {}", e);
                return bad_request(format!("Failed to read clip: {}", e));
            }
        }
    };

    info!(
        "Received clip ({} bytes, {})",
        clip.len(),
        clip.mime_type()
    );

    match state.orchestrator.submit(clip).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => bad_request(e.to_string()),
    }
}

fn is_clip_field(field: &Field<'_>) -> bool {
    field
        .name()
        .map(|name| CLIP_FIELDS.contains(&name))
        .unwrap_or(false)
        || field.file_name().is_some()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
