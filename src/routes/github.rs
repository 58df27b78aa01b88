use crate::{
    dto::github_dto::{ImportRemoteFilesPayload, ListRemoteFilesQuery},
    error::Result,
    AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

pub async fn list_remote_files(
    State(state): State<AppState>,
    Query(query): Query<ListRemoteFilesQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let files = state
        .github_service
        .list_markdown_files(&query.owner, &query.repo, &query.path, query.branch.as_deref())
        .await?;
    Ok(Json(files))
}

#[axum::debug_handler]
pub async fn import_remote_files(
    State(state): State<AppState>,
    Json(payload): Json<ImportRemoteFilesPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state
        .question_bank_service
        .import_remote(&state.github_service, &payload.files)
        .await;
    let status = if result.imported.is_empty() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(result)))
}
