//! Single-shot structured feedback from a generative multimodal model
//!
//! The clip is sent inline (base64) together with an instruction prompt; the
//! model answers with free text that must contain a JSON document of the
//! `AnalysisResult` shape. Anything short of a complete document is rejected.

mod adapter;
pub mod messages;
mod prompt;
mod result;

pub use adapter::{extract_analysis, is_supported_mime, AnalysisAdapter, AnalysisError};
pub use prompt::build_prompt;
pub use result::{AnalysisResult, BodyLanguage, Feedback, SoftSkills, TechnicalResponse};
