use crate::dto::github_dto::RemoteFileRef;
use crate::dto::question_bank_dto::{ImportFailure, ImportResult};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::question_bank::{QuestionBank, QuestionBankSummary};
use crate::services::github_service::GithubService;
use crate::services::parser_service::{parse_question_bank, week_number_from_name};
use crate::services::store_service::StoreService;
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct QuestionBankService {
    store: StoreService,
}

impl QuestionBankService {
    pub fn new(store: StoreService) -> Self {
        Self { store }
    }

    /// Parses and stores a markdown bank. When no week is given it is taken
    /// from the bank name (`week-3.md` → 3). Question ids are prefixed with
    /// the bank id so banks for the same week never collide in a pool.
    pub async fn create_from_markdown(
        &self,
        name: &str,
        week_number: Option<u32>,
        markdown: &str,
        source: Option<String>,
    ) -> Result<QuestionBank> {
        let week_number = week_number.or_else(|| week_number_from_name(name));
        let mut questions =
            parse_question_bank(markdown, week_number, source.as_deref().unwrap_or(name));
        if questions.is_empty() {
            return Err(Error::BadRequest(format!(
                "No questions found in '{}'. Questions must use '### Q<number>: text' headings.",
                name
            )));
        }

        let id = Uuid::new_v4();
        let prefix = bank_prefix(id);
        for question in &mut questions {
            question.id = format!("{}-{}", prefix, question.id);
        }

        let bank = QuestionBank {
            id,
            name: name.to_string(),
            week_number,
            source,
            questions,
            created_at: Utc::now(),
        };
        self.store.save_bank(&bank).await?;
        tracing::info!(
            bank_id = %bank.id,
            name = %bank.name,
            week = ?bank.week_number,
            questions = bank.questions.len(),
            "Question bank stored"
        );
        Ok(bank)
    }

    pub async fn list(&self) -> Result<Vec<QuestionBankSummary>> {
        let banks = self.store.list_banks().await?;
        Ok(banks.iter().map(QuestionBankSummary::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<QuestionBank> {
        self.store.get_bank(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_bank(id).await? {
            return Err(Error::NotFound(format!("Question bank {} not found", id)));
        }
        Ok(())
    }

    /// Question pool for sampling: the given banks, or every stored bank when
    /// no ids are supplied.
    pub async fn pool(&self, bank_ids: Option<&[Uuid]>) -> Result<Vec<Question>> {
        let banks = match bank_ids {
            Some(ids) if !ids.is_empty() => {
                let mut banks = Vec::with_capacity(ids.len());
                for id in ids {
                    banks.push(self.store.get_bank(*id).await?);
                }
                banks
            }
            _ => self.store.list_banks().await?,
        };
        Ok(banks.into_iter().flat_map(|b| b.questions).collect())
    }

    /// Fetches and stores each remote file. A failing file is reported in the
    /// result and does not stop the rest of the import.
    pub async fn import_remote(
        &self,
        github: &GithubService,
        files: &[RemoteFileRef],
    ) -> ImportResult {
        let mut imported = Vec::new();
        let mut failed = Vec::new();

        for file in files {
            let outcome = match file.validate() {
                Ok(()) => self.import_one(github, file).await,
                Err(e) => Err(e.into()),
            };
            match outcome {
                Ok(bank) => imported.push(QuestionBankSummary::from(&bank)),
                Err(e) => {
                    tracing::warn!(file = %file.name, error = %e, "Remote question bank import failed");
                    failed.push(ImportFailure {
                        name: file.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        ImportResult { imported, failed }
    }

    async fn import_one(&self, github: &GithubService, file: &RemoteFileRef) -> Result<QuestionBank> {
        let markdown = github.fetch_file(&file.download_url).await?;
        self.create_from_markdown(&file.name, None, &markdown, Some(file.download_url.clone()))
            .await
    }
}

fn bank_prefix(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
