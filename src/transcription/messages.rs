use serde::{Deserialize, Serialize};

/// Response to `POST /upload`
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

/// Body of `POST /transcript`
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptRequest {
    pub audio_url: String,
    pub sentiment_analysis: bool,
}

/// Body of `GET /transcript/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptStatusMessage {
    pub id: Option<String>,
    /// queued | processing | completed | error
    pub status: String,
    pub text: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub sentiment_analysis_results: Option<Vec<SentimentResultMessage>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentimentResultMessage {
    pub text: String,
    /// POSITIVE | NEGATIVE | NEUTRAL
    pub sentiment: String,
    pub confidence: f64,
    /// Milliseconds from the start of the clip
    pub start: Option<u64>,
    pub end: Option<u64>,
}
