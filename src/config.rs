use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::jobs::PollPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub transcription: TranscriptionConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Connection setup cap for outbound calls. Request duration is bounded
    /// per path by `transcription.timeout_ms` and `analysis.timeout_ms`.
    pub connect_timeout_ms: u64,
}

impl ServiceConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Largest accepted clip upload
    pub max_upload_bytes: usize,
}

/// Transcription/sentiment job service
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    pub base_url: String,
    pub api_key: String,
    pub poll_interval_ms: u64,
    /// Wait budget for one transcription job, measured from submission
    pub timeout_ms: u64,
}

impl TranscriptionConfig {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_wait: Duration::from_millis(self.timeout_ms),
        }
    }
}

/// Generative multimodal model service
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
    /// Interview question the recorded answer responds to
    pub question: String,
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from an optional file at `path` (extension
    /// inferred), overridden by `COACH_*` environment variables such as
    /// `COACH_TRANSCRIPTION__API_KEY`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("COACH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = config::Config::builder()
            .set_default("service.name", "interview-coach")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8080)?
            .set_default("service.http.max_upload_bytes", 100 * 1024 * 1024)?
            .set_default("service.connect_timeout_ms", 10_000)?
            .set_default("transcription.base_url", "https://api.assemblyai.com/v2")?
            .set_default("transcription.api_key", "")?
            .set_default("transcription.poll_interval_ms", 5000)?
            .set_default("transcription.timeout_ms", 300_000)?
            .set_default(
                "analysis.base_url",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("analysis.api_key", "")?
            .set_default("analysis.model", "gemini-1.5-pro")?
            .set_default("analysis.timeout_ms", 120_000)?
            .set_default("analysis.question", "Tell me about yourself.")?;

        Ok(builder)
    }
}
