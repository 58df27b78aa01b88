use crate::{
    dto::question_bank_dto::CreateQuestionBankPayload,
    dto::session_dto::SamplePreviewPayload,
    error::{Error, Result},
    models::question_bank::QuestionBankSummary,
    services::parser_service::week_number_from_name,
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

pub async fn list_question_banks(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let banks = state.question_bank_service.list().await?;
    Ok(Json(banks))
}

#[axum::debug_handler]
pub async fn create_question_bank(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionBankPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let bank = state
        .question_bank_service
        .create_from_markdown(&payload.name, payload.week_number, &payload.markdown, None)
        .await?;
    Ok((StatusCode::CREATED, Json(QuestionBankSummary::from(&bank))))
}

/// Multipart upload: a `file` part with the markdown plus optional `name` and
/// `week_number` parts.
pub async fn upload_question_bank(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut name: Option<String> = None;
    let mut week_number: Option<u32> = None;
    let mut markdown: Option<(String, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(Error::Multipart)? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => {
                let value = field.text().await.map_err(Error::Multipart)?;
                if !value.trim().is_empty() {
                    name = Some(value.trim().to_string());
                }
            }
            "week_number" => {
                let value = field.text().await.map_err(Error::Multipart)?;
                if !value.trim().is_empty() {
                    week_number = Some(value.trim().parse().map_err(|_| {
                        Error::BadRequest(format!("Invalid week_number: {}", value))
                    })?);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or("questions.md").to_string();
                let data = field.bytes().await.map_err(Error::Multipart)?;
                let text = String::from_utf8(data.to_vec())
                    .map_err(|_| Error::BadRequest("Uploaded file is not valid UTF-8".to_string()))?;
                markdown = Some((filename, text));
            }
            _ => {}
        }
    }

    let (filename, text) =
        markdown.ok_or_else(|| Error::BadRequest("Missing 'file' part".to_string()))?;
    let week_number = week_number.or_else(|| week_number_from_name(&filename));
    let bank_name = name.unwrap_or_else(|| filename.clone());
    let bank = state
        .question_bank_service
        .create_from_markdown(&bank_name, week_number, &text, Some(filename))
        .await?;
    Ok((StatusCode::CREATED, Json(QuestionBankSummary::from(&bank))))
}

pub async fn get_question_bank(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let bank = state.question_bank_service.get(id).await?;
    Ok(Json(bank))
}

pub async fn delete_question_bank(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.question_bank_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn preview_sample(
    State(state): State<AppState>,
    Json(payload): Json<SamplePreviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let questions = state
        .session_service
        .preview_sample(payload.bank_ids.as_deref(), payload.question_count, payload.level)
        .await?;
    Ok(Json(json!({
        "count": questions.len(),
        "questions": questions,
    })))
}
