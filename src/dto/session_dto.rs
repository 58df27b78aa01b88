use crate::models::question::ExperienceLevel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionPayload {
    #[validate(length(min = 1, message = "Candidate name cannot be empty"))]
    pub candidate_name: String,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub position: Option<String>,
    #[serde(default)]
    pub level: ExperienceLevel,
    #[validate(range(min = 1, max = 200, message = "Question count must be between 1 and 200"))]
    pub question_count: Option<usize>,
    pub bank_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SamplePreviewPayload {
    #[validate(range(max = 200, message = "Question count must not exceed 200"))]
    pub question_count: usize,
    #[serde(default)]
    pub level: ExperienceLevel,
    pub bank_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAssessmentPayload {
    pub answer_notes: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: Option<u8>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub feedback: Option<String>,
}

// Trims strings and turns empty ones into None
pub(crate) fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
