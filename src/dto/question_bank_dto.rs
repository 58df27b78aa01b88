use crate::models::question_bank::QuestionBankSummary;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionBankPayload {
    #[validate(length(min = 1, message = "Bank name cannot be empty"))]
    pub name: String,
    pub week_number: Option<u32>,
    #[validate(length(min = 1, message = "Markdown content cannot be empty"))]
    pub markdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFailure {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: Vec<QuestionBankSummary>,
    pub failed: Vec<ImportFailure>,
}
