use crate::dto::session_dto::{CreateSessionPayload, UpdateAssessmentPayload};
use crate::error::{Error, Result};
use crate::models::question::{ExperienceLevel, Question};
use crate::models::session::{
    Assessment, InterviewSession, ScoreSource, SessionStatus, SessionSummary,
};
use crate::services::question_bank_service::QuestionBankService;
use crate::services::sampler_service::sample_questions;
use crate::services::scoring_service::ScoringService;
use crate::services::store_service::StoreService;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionService {
    store: StoreService,
    banks: QuestionBankService,
    scoring: ScoringService,
    rng: Arc<Mutex<StdRng>>,
    default_question_count: usize,
}

impl SessionService {
    pub fn new(
        store: StoreService,
        banks: QuestionBankService,
        scoring: ScoringService,
        default_question_count: usize,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store,
            banks,
            scoring,
            rng: Arc::new(Mutex::new(rng)),
            default_question_count,
        }
    }

    fn sample(&self, pool: &[Question], count: usize, level: ExperienceLevel) -> Vec<Question> {
        let mut rng = self.rng.lock().expect("sampler rng mutex poisoned");
        sample_questions(pool, count, level, &mut *rng)
    }

    pub async fn preview_sample(
        &self,
        bank_ids: Option<&[Uuid]>,
        count: usize,
        level: ExperienceLevel,
    ) -> Result<Vec<Question>> {
        let pool = self.banks.pool(bank_ids).await?;
        Ok(self.sample(&pool, count, level))
    }

    pub async fn create_session(&self, payload: CreateSessionPayload) -> Result<InterviewSession> {
        let pool = self.banks.pool(payload.bank_ids.as_deref()).await?;
        if pool.is_empty() {
            return Err(Error::BadRequest(
                "No questions available. Upload a question bank first.".to_string(),
            ));
        }

        let count = payload.question_count.unwrap_or(self.default_question_count);
        let questions = self.sample(&pool, count, payload.level);
        if questions.len() < count {
            tracing::warn!(
                requested = count,
                available = questions.len(),
                "Question pool smaller than requested count"
            );
        }

        let now = Utc::now();
        let session = InterviewSession {
            id: Uuid::new_v4(),
            candidate_name: payload.candidate_name.trim().to_string(),
            position: payload.position,
            level: payload.level,
            status: SessionStatus::InProgress,
            assessments: questions.iter().map(|q| Assessment::pending(&q.id)).collect(),
            questions,
            summary: None,
            overall_score: None,
            created_at: now,
            updated_at: now,
        };
        self.store.save_session(&session).await?;
        tracing::info!(
            session_id = %session.id,
            candidate = %session.candidate_name,
            questions = session.questions.len(),
            "Interview session created"
        );
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<InterviewSession> {
        self.store.get_session(id).await
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.store.list_sessions().await
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_session(id).await? {
            return Err(Error::NotFound(format!("Interview session {} not found", id)));
        }
        Ok(())
    }

    pub async fn record_answer(
        &self,
        id: Uuid,
        question_id: &str,
        notes: &str,
    ) -> Result<InterviewSession> {
        self.update_assessment(
            id,
            question_id,
            UpdateAssessmentPayload {
                answer_notes: Some(notes.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn override_score(
        &self,
        id: Uuid,
        question_id: &str,
        score: u8,
        feedback: Option<String>,
    ) -> Result<InterviewSession> {
        self.update_assessment(
            id,
            question_id,
            UpdateAssessmentPayload {
                answer_notes: None,
                score: Some(score),
                feedback,
            },
        )
        .await
    }

    /// Applies interviewer notes and/or a manual score. Scores may still be
    /// edited after completion; notes may not.
    pub async fn update_assessment(
        &self,
        id: Uuid,
        question_id: &str,
        payload: UpdateAssessmentPayload,
    ) -> Result<InterviewSession> {
        let mut session = self.store.get_session(id).await?;
        let completed = session.status == SessionStatus::Completed;
        if completed && payload.answer_notes.is_some() {
            return Err(Error::BadRequest(
                "Answers cannot be changed on a completed interview".to_string(),
            ));
        }
        if let Some(score) = payload.score {
            validate_score(score)?;
        }

        let assessment = find_assessment(&mut session, question_id)?;
        if let Some(notes) = payload.answer_notes {
            assessment.answer_notes = notes;
        }
        if let Some(score) = payload.score {
            assessment.score = Some(score);
            assessment.score_source = Some(ScoreSource::Manual);
            assessment.scored_at = Some(Utc::now());
            if payload.feedback.is_some() {
                assessment.feedback = payload.feedback;
            }
        } else if payload.feedback.is_some() {
            assessment.feedback = payload.feedback;
        }

        if completed {
            session.overall_score = session.average_score();
        }
        session.updated_at = Utc::now();
        self.store.save_session(&session).await?;
        Ok(session)
    }

    /// Runs the scoring collaborator for one answer. Scoring never fails the
    /// request; an unavailable backend yields a neutral fallback score.
    pub async fn score_answer(&self, id: Uuid, question_id: &str) -> Result<Assessment> {
        let mut session = self.store.get_session(id).await?;
        ensure_in_progress(&session)?;

        let question = session
            .question(question_id)
            .cloned()
            .ok_or_else(|| question_not_found(question_id))?;
        let current = find_assessment(&mut session, question_id)?.clone();

        let result = self.scoring.score(&question, &current).await;
        tracing::info!(
            session_id = %id,
            question_id,
            score = result.score,
            source = ?result.source,
            "Answer scored"
        );

        let assessment = find_assessment(&mut session, question_id)?;
        assessment.score = Some(result.score);
        assessment.feedback = Some(result.feedback);
        assessment.score_source = Some(result.source);
        assessment.scored_at = Some(Utc::now());
        let updated = assessment.clone();

        session.updated_at = Utc::now();
        self.store.save_session(&session).await?;
        Ok(updated)
    }

    pub async fn complete_session(&self, id: Uuid) -> Result<InterviewSession> {
        let mut session = self.store.get_session(id).await?;
        ensure_in_progress(&session)?;

        session.summary = Some(self.scoring.summarize(&session).await);
        session.overall_score = session.average_score();
        session.status = SessionStatus::Completed;
        session.updated_at = Utc::now();
        self.store.save_session(&session).await?;

        tracing::info!(
            session_id = %id,
            overall_score = ?session.overall_score,
            "Interview session completed"
        );
        Ok(session)
    }
}

fn validate_score(score: u8) -> Result<()> {
    if (1..=5).contains(&score) {
        Ok(())
    } else {
        Err(Error::BadRequest(format!("Score must be between 1 and 5, got {}", score)))
    }
}

fn ensure_in_progress(session: &InterviewSession) -> Result<()> {
    if session.status == SessionStatus::Completed {
        return Err(Error::BadRequest(format!(
            "Interview session {} is already completed",
            session.id
        )));
    }
    Ok(())
}

fn find_assessment<'a>(
    session: &'a mut InterviewSession,
    question_id: &str,
) -> Result<&'a mut Assessment> {
    session
        .assessment_mut(question_id)
        .ok_or_else(|| question_not_found(question_id))
}

fn question_not_found(question_id: &str) -> Error {
    Error::NotFound(format!("Question {} is not part of this interview", question_id))
}
