use crate::submission::MediaKind;

/// Instruction prompt asking the model to grade a recorded answer to
/// `question` and reply with the `AnalysisResult` JSON shape only.
///
/// Audio clips still get the full shape, but the model is told that body
/// language cannot be observed so those fields say so instead of guessing.
pub fn build_prompt(question: &str, kind: MediaKind) -> String {
    let (medium, body_language) = match kind {
        MediaKind::Video => (
            "video",
            "3. Body language: analyze posture, gestures and facial expressions.",
        ),
        MediaKind::Audio => (
            "audio recording",
            "3. Body language: this is an audio-only recording, so posture, gestures and facial \
             expressions cannot be observed. Answer each body_language field with \"Not assessable \
             from audio\".",
        ),
    };

    format!(
        r#"The {medium} provided is an answer to the interview question: "{question}"
Analyze the answer for the following aspects:
1. Technical response: evaluate the accuracy and depth of the information provided.
2. Soft skills: assess communication skills, clarity of explanation and overall presentation.
{body_language}
Then give one suggestion for improvement covering all areas.

Reply with a single JSON object and nothing else. Every value is a short free-text assessment:
{{
  "technical_response": {{
    "accuracy": "...",
    "depth": "..."
  }},
  "soft_skills": {{
    "communication_skills": "...",
    "clarity_of_explanation": "...",
    "presentation": "..."
  }},
  "body_language": {{
    "posture": "...",
    "gestures": "...",
    "facial_expressions": "..."
  }},
  "feedback": {{
    "suggestion": "..."
  }}
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_question_and_shape() {
        let prompt = build_prompt("Why should we hire you?", MediaKind::Video);
        assert!(prompt.contains("\"Why should we hire you?\""));
        assert!(prompt.contains("\"body_language\""));
        assert!(prompt.contains("\"suggestion\""));
    }

    #[test]
    fn test_video_prompt_asks_for_body_language() {
        let prompt = build_prompt("Q", MediaKind::Video);
        assert!(prompt.starts_with("The video provided"));
        assert!(prompt.contains("analyze posture, gestures and facial expressions"));
        assert!(!prompt.contains("audio"));
    }

    #[test]
    fn test_audio_prompt_does_not_claim_video() {
        let prompt = build_prompt("Q", MediaKind::Audio);
        assert!(prompt.starts_with("The audio recording provided"));
        assert!(!prompt.contains("video"));
        assert!(prompt.contains("Not assessable from audio"));
        // Shape is unchanged so the reply still validates
        assert!(prompt.contains("\"facial_expressions\""));
    }
}
