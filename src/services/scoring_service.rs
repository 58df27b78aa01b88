use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::session::{Assessment, InterviewSession, ScoreSource};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

pub const NEUTRAL_SCORE: u8 = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub score: u8,
    pub feedback: String,
    pub source: ScoreSource,
}

impl ScoreResult {
    fn fallback(reason: &str) -> Self {
        Self {
            score: NEUTRAL_SCORE,
            feedback: format!(
                "Automatic scoring was unavailable ({}). A neutral score was applied; please review manually.",
                reason
            ),
            source: ScoreSource::Fallback,
        }
    }
}

/// LLM-backed scorer. Every public call degrades to a placeholder instead of
/// failing, so an interview never stalls on the scoring backend.
#[derive(Clone)]
pub struct ScoringService {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl ScoringService {
    pub fn new(api_key: Option<String>, api_url: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            api_url,
            model,
        }
    }

    pub async fn score(&self, question: &Question, assessment: &Assessment) -> ScoreResult {
        if assessment.answer_notes.trim().is_empty() {
            return ScoreResult {
                score: 1,
                feedback: "No answer was recorded for this question.".to_string(),
                source: ScoreSource::Fallback,
            };
        }

        let system_prompt = r#"You are a senior technical interviewer grading a candidate's answer.
Compare the interviewer's notes on the candidate's answer with the question, the expected keywords and the model answer.
Return a JSON object: { "score": <integer 1-5>, "feedback": "<two or three sentences of concrete feedback>" }.
Scale: 1 = no understanding, 3 = partially correct, 5 = complete and precise."#;

        let user_content = serde_json::json!({
            "question": question.text,
            "difficulty": question.difficulty,
            "expected_keywords": question.keywords,
            "model_answer": question.model_answer,
            "candidate_answer_notes": assessment.answer_notes,
        });

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_content.to_string()}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.2
        });

        match self.chat(payload).await {
            Ok(resp) => match parse_score(&resp) {
                Some(result) => result,
                None => {
                    tracing::warn!(question_id = %question.id, "Scoring response had no usable score");
                    ScoreResult::fallback("unexpected response from scoring model")
                }
            },
            Err(e) => {
                tracing::error!(question_id = %question.id, error = %e, "Answer scoring failed");
                ScoreResult::fallback(&e.to_string())
            }
        }
    }

    pub async fn summarize(&self, session: &InterviewSession) -> String {
        let system_prompt = "You are a hiring manager. Write a concise interview summary (one paragraph) \
            covering strengths, gaps and a hiring recommendation. \
            Return a JSON object with a single field 'summary'.";

        let answers: Vec<JsonValue> = session
            .questions
            .iter()
            .zip(&session.assessments)
            .map(|(q, a)| {
                serde_json::json!({
                    "question": q.text,
                    "difficulty": q.difficulty,
                    "notes": a.answer_notes,
                    "score": a.score,
                    "feedback": a.feedback,
                })
            })
            .collect();

        let user_data = serde_json::json!({
            "candidate": session.candidate_name,
            "position": session.position,
            "level": session.level,
            "answers": answers,
        });

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_data.to_string()}
            ],
            "response_format": { "type": "json_object" }
        });

        match self.chat(payload).await {
            Ok(resp) => {
                if let Some(summary) = resp.get("summary").and_then(|v| v.as_str()) {
                    return summary.trim().to_string();
                }
                tracing::warn!(session_id = %session.id, "Summary response missing 'summary' field");
            }
            Err(e) => tracing::error!(session_id = %session.id, error = %e, "Summary generation failed"),
        }

        fallback_summary(session)
    }

    async fn chat(&self, payload: JsonValue) -> Result<JsonValue> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("scoring API key is not configured"))?;

        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(Duration::from_secs(60))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Scoring API error {}: {}", status, text)));
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| anyhow::anyhow!("Invalid scoring API response format").into())
    }
}

fn parse_score(resp: &JsonValue) -> Option<ScoreResult> {
    let raw = resp.get("score")?;
    let score = raw
        .as_f64()
        .or_else(|| raw.as_str().and_then(|s| s.trim().parse().ok()))?;
    let feedback = resp
        .get("feedback")
        .and_then(|v| v.as_str())
        .unwrap_or("No feedback provided.")
        .trim()
        .to_string();
    Some(ScoreResult {
        score: score.round().clamp(1.0, 5.0) as u8,
        feedback,
        source: ScoreSource::Ai,
    })
}

fn fallback_summary(session: &InterviewSession) -> String {
    match session.average_score() {
        Some(avg) => format!(
            "Automatic summary unavailable. {} of {} answers were scored with an average of {:.2} / 5.",
            session.scored_count(),
            session.questions.len(),
            avg
        ),
        None => format!(
            "Automatic summary unavailable. None of the {} answers have been scored yet.",
            session.questions.len()
        ),
    }
}
