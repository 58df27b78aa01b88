use crate::error::{Error, Result};
use crate::models::question_bank::QuestionBank;
use crate::models::session::{InterviewSession, SessionSummary};
use crate::services::sampler_service::WeekKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

const BANKS_DIR: &str = "banks";
const SESSIONS_DIR: &str = "sessions";

/// JSON-file store for uploaded question banks and interview history.
#[derive(Clone)]
pub struct StoreService {
    data_dir: PathBuf,
}

impl StoreService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub async fn save_bank(&self, bank: &QuestionBank) -> Result<()> {
        write_json(&self.data_dir.join(BANKS_DIR), bank.id, bank).await
    }

    pub async fn get_bank(&self, id: Uuid) -> Result<QuestionBank> {
        read_json(&entry_path(&self.data_dir.join(BANKS_DIR), id))
            .await
            .map_err(|e| not_found_as(e, format!("Question bank {} not found", id)))
    }

    /// All banks ordered by week (unnumbered last) and then by name.
    pub async fn list_banks(&self) -> Result<Vec<QuestionBank>> {
        let mut banks: Vec<QuestionBank> = read_all(&self.data_dir.join(BANKS_DIR)).await?;
        banks.sort_by(|a, b| {
            WeekKey::from(a.week_number)
                .cmp(&WeekKey::from(b.week_number))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(banks)
    }

    pub async fn delete_bank(&self, id: Uuid) -> Result<bool> {
        remove_entry(&entry_path(&self.data_dir.join(BANKS_DIR), id)).await
    }

    pub async fn save_session(&self, session: &InterviewSession) -> Result<()> {
        write_json(&self.data_dir.join(SESSIONS_DIR), session.id, session).await
    }

    pub async fn get_session(&self, id: Uuid) -> Result<InterviewSession> {
        read_json(&entry_path(&self.data_dir.join(SESSIONS_DIR), id))
            .await
            .map_err(|e| not_found_as(e, format!("Interview session {} not found", id)))
    }

    /// Interview history, newest first.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let sessions: Vec<InterviewSession> = read_all(&self.data_dir.join(SESSIONS_DIR)).await?;
        let mut summaries: Vec<SessionSummary> = sessions.iter().map(SessionSummary::from).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<bool> {
        remove_entry(&entry_path(&self.data_dir.join(SESSIONS_DIR), id)).await
    }
}

fn entry_path(dir: &Path, id: Uuid) -> PathBuf {
    dir.join(format!("{}.json", id))
}

fn not_found_as(err: Error, message: String) -> Error {
    match err {
        Error::NotFound(_) => Error::NotFound(message),
        other => other,
    }
}

async fn write_json<T: Serialize>(dir: &Path, id: Uuid, value: &T) -> Result<()> {
    fs::create_dir_all(dir).await?;
    let body = serde_json::to_vec_pretty(value)?;
    let tmp = dir.join(format!("{}.json.tmp", id));
    fs::write(&tmp, body).await?;
    fs::rename(&tmp, entry_path(dir, id)).await?;
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read(path).await?;
    Ok(serde_json::from_slice(&raw)?)
}

async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut items = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(item) => items.push(item),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable store entry"),
        }
    }
    Ok(items)
}

async fn remove_entry(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
