use crate::models::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: Uuid,
    pub name: String,
    pub week_number: Option<u32>,
    pub source: Option<String>,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBankSummary {
    pub id: Uuid,
    pub name: String,
    pub week_number: Option<u32>,
    pub source: Option<String>,
    pub question_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&QuestionBank> for QuestionBankSummary {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id,
            name: bank.name.clone(),
            week_number: bank.week_number,
            source: bank.source.clone(),
            question_count: bank.questions.len(),
            created_at: bank.created_at,
        }
    }
}
