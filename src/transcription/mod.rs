//! Transcription and sentiment analysis via an asynchronous job service
//!
//! Flow for one clip:
//! 1. `POST /upload` with the raw clip bytes - returns an `upload_url`
//! 2. `POST /transcript` with `{audio_url, sentiment_analysis: true}` - returns a job id
//! 3. `GET /transcript/{id}` until `completed` or `error`

mod adapter;
pub mod messages;
mod result;

pub use adapter::{classify_transcript_status, TranscriptionAdapter};
pub use result::{SentimentSegment, Sentiment, TranscriptionResult};
