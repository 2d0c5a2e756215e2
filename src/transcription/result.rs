use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Parse a service label such as `POSITIVE` (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEGATIVE" => Some(Sentiment::Negative),
            "NEUTRAL" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSegment {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_ms: Option<u64>,
}

/// Transcript of a clip with per-sentence sentiment, in spoken order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub sentiment_segments: Vec<SentimentSegment>,
}
