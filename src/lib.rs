pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{
    github_service::GithubService, question_bank_service::QuestionBankService,
    scoring_service::ScoringService, session_service::SessionService,
    store_service::StoreService,
};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub question_bank_service: QuestionBankService,
    pub session_service: SessionService,
    pub github_service: GithubService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let store = StoreService::new(config.data_dir.clone());
        let question_bank_service = QuestionBankService::new(store.clone());
        let scoring_service = ScoringService::new(
            config.openai_api_key.clone(),
            config.openai_api_url.clone(),
            config.openai_model.clone(),
            http_client.clone(),
        );
        let session_service = SessionService::new(
            store,
            question_bank_service.clone(),
            scoring_service,
            config.default_question_count,
            config.sampler_seed,
        );
        let github_service = GithubService::new(
            config.github_api_url.clone(),
            config.github_token.clone(),
            http_client,
        );

        Ok(Self {
            question_bank_service,
            session_service,
            github_service,
        })
    }
}
