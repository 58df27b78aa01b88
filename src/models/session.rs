use crate::models::question::{ExperienceLevel, Question};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Ai,
    Manual,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub question_id: String,
    #[serde(default)]
    pub answer_notes: String,
    pub score: Option<u8>,
    pub feedback: Option<String>,
    pub score_source: Option<ScoreSource>,
    pub scored_at: Option<DateTime<Utc>>,
}

impl Assessment {
    pub fn pending(question_id: &str) -> Self {
        Self {
            question_id: question_id.to_string(),
            answer_notes: String::new(),
            score: None,
            feedback: None,
            score_source: None,
            scored_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub candidate_name: String,
    pub position: Option<String>,
    pub level: ExperienceLevel,
    pub status: SessionStatus,
    pub questions: Vec<Question>,
    pub assessments: Vec<Assessment>,
    pub summary: Option<String>,
    pub overall_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn assessment_mut(&mut self, question_id: &str) -> Option<&mut Assessment> {
        self.assessments
            .iter_mut()
            .find(|a| a.question_id == question_id)
    }

    /// Mean of all scored assessments, rounded to two decimals.
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<f64> = self
            .assessments
            .iter()
            .filter_map(|a| a.score.map(f64::from))
            .collect();
        if scores.is_empty() {
            return None;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        Some((mean * 100.0).round() / 100.0)
    }

    pub fn scored_count(&self) -> usize {
        self.assessments.iter().filter(|a| a.score.is_some()).count()
    }
}

/// Lightweight row for the interview history list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub candidate_name: String,
    pub position: Option<String>,
    pub level: ExperienceLevel,
    pub status: SessionStatus,
    pub question_count: usize,
    pub overall_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<&InterviewSession> for SessionSummary {
    fn from(session: &InterviewSession) -> Self {
        Self {
            id: session.id,
            candidate_name: session.candidate_name.clone(),
            position: session.position.clone(),
            level: session.level,
            status: session.status,
            question_count: session.questions.len(),
            overall_score: session.overall_score,
            created_at: session.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_scores(scores: &[Option<u8>]) -> InterviewSession {
        let now = Utc::now();
        InterviewSession {
            id: Uuid::new_v4(),
            candidate_name: "Alice".into(),
            position: None,
            level: ExperienceLevel::Entry,
            status: SessionStatus::InProgress,
            questions: vec![],
            assessments: scores
                .iter()
                .enumerate()
                .map(|(i, s)| Assessment {
                    score: *s,
                    ..Assessment::pending(&format!("q{}", i))
                })
                .collect(),
            summary: None,
            overall_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn average_ignores_unscored_answers() {
        let session = session_with_scores(&[Some(4), None, Some(3), Some(4)]);
        assert_eq!(session.average_score(), Some(3.67));
        assert_eq!(session.scored_count(), 3);
    }

    #[test]
    fn average_is_none_without_scores() {
        let session = session_with_scores(&[None, None]);
        assert_eq!(session.average_score(), None);
    }
}
