use serde::{Deserialize, Serialize};

/// Complete structured feedback on one answer.
///
/// Every leaf is required; deserialization fails on any missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub technical_response: TechnicalResponse,
    pub soft_skills: SoftSkills,
    pub body_language: BodyLanguage,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalResponse {
    pub accuracy: String,
    pub depth: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftSkills {
    pub communication_skills: String,
    pub clarity_of_explanation: String,
    pub presentation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyLanguage {
    pub posture: String,
    pub gestures: String,
    pub facial_expressions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(alias = "suggesstion")]
    pub suggestion: String,
}
