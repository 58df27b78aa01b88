pub mod github;
pub mod health;
pub mod question_bank;
pub mod session;

use crate::{middleware::rate_limit, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: AppState, api_rps: u32) -> Router {
    let base_routes = Router::new().route("/health", get(health::health));

    let api = Router::new()
        .route(
            "/api/question-banks",
            get(question_bank::list_question_banks).post(question_bank::create_question_bank),
        )
        .route(
            "/api/question-banks/upload",
            post(question_bank::upload_question_bank),
        )
        .route(
            "/api/question-banks/:id",
            get(question_bank::get_question_bank).delete(question_bank::delete_question_bank),
        )
        .route("/api/sample", post(question_bank::preview_sample))
        .route(
            "/api/sessions",
            get(session::list_sessions).post(session::create_session),
        )
        .route(
            "/api/sessions/:id",
            get(session::get_session).delete(session::delete_session),
        )
        .route(
            "/api/sessions/:id/assessments/:question_id",
            patch(session::update_assessment),
        )
        .route(
            "/api/sessions/:id/assessments/:question_id/score",
            post(session::score_assessment),
        )
        .route(
            "/api/sessions/:id/complete",
            post(session::complete_session),
        )
        .route("/api/github/files", get(github::list_remote_files))
        .route("/api/github/import", post(github::import_remote_files))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(api_rps),
            rate_limit::rps_middleware,
        ));

    base_routes
        .merge(api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
