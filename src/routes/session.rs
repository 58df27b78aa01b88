use crate::{
    dto::session_dto::{CreateSessionPayload, UpdateAssessmentPayload},
    error::Result,
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state.session_service.create_session(payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sessions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sessions = state.session_service.list_sessions().await?;
    Ok(Json(sessions))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let session = state.session_service.get_session(id).await?;
    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.session_service.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn update_assessment(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateAssessmentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let session = state
        .session_service
        .update_assessment(id, &question_id, payload)
        .await?;
    Ok(Json(session))
}

pub async fn score_assessment(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse> {
    let assessment = state.session_service.score_answer(id, &question_id).await?;
    Ok(Json(assessment))
}

pub async fn complete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let session = state.session_service.complete_session(id).await?;
    Ok(Json(session))
}
