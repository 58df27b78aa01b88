use std::path::PathBuf;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use interview_assessor::{config::Config, routes, AppState};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const WEEK_ONE: &str = r#"# Week 1

## Beginner
### Q1: What is a variable binding?
**Keywords:** let, immutability
### Q2: What does `mut` change?

## Intermediate
### Q3: Explain shadowing.
### Q4: When does a value get dropped?

## Advanced
### Q5: What is a drop check?
<details>
<summary>Answer</summary>
The compiler verifies that a destructor cannot observe dangling data.
</details>
### Q6: Why can't `Drop` and `Copy` coexist?
"#;

const WEEK_TWO: &str = "## Foundational\n### Q1: What is a trait?\n### Q2: What is impl Trait?\n\
## Application\n### Q3: Static vs dynamic dispatch?\n### Q4: What is a blanket impl?\n\
## Deep Dive\n### Q5: Explain object safety.\n### Q6: What are GATs for?\n";

fn test_config(data_dir: PathBuf) -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        data_dir,
        api_rps: 1000,
        default_question_count: 4,
        openai_api_key: None,
        openai_model: "gpt-4o".to_string(),
        openai_api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
        github_api_url: "http://127.0.0.1:9".to_string(),
        github_token: None,
        sampler_seed: Some(42),
    }
}

fn setup_app(data_dir: PathBuf) -> Router {
    let config = test_config(data_dir);
    let state = AppState::new(&config).expect("app state");
    routes::router(state, config.api_rps)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn upload(app: &Router, file_name: &str, markdown: &str) -> (StatusCode, JsonValue) {
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/markdown\r\n\r\n{m}\r\n--{b}--\r\n",
        b = boundary,
        f = file_name,
        m = markdown
    );
    let req = Request::builder()
        .method("POST")
        .uri("/api/question-banks/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path().to_path_buf());
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn interview_flow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path().to_path_buf());

    let (status, bank) = send(
        &app,
        "POST",
        "/api/question-banks",
        Some(json!({ "name": "week-1.md", "markdown": WEEK_ONE })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bank["week_number"], 1);
    assert_eq!(bank["question_count"], 6);

    let (status, uploaded) = upload(&app, "week-2.md", WEEK_TWO).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(uploaded["week_number"], 2);
    assert_eq!(uploaded["question_count"], 6);

    let (status, banks) = send(&app, "GET", "/api/question-banks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(banks.as_array().unwrap().len(), 2);

    let bank_id = bank["id"].as_str().unwrap().to_string();
    let (status, full) = send(&app, "GET", &format!("/api/question-banks/{}", bank_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["questions"][4]["difficulty"], "advanced");
    assert!(full["questions"][4]["model_answer"]
        .as_str()
        .unwrap()
        .contains("destructor"));

    let (status, preview) = send(
        &app,
        "POST",
        "/api/sample",
        Some(json!({ "question_count": 6, "level": "experienced" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["count"], 6);
    let week_one = preview["questions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|q| q["week_number"] == 1)
        .count();
    assert_eq!(week_one, 3);

    let (status, session) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "candidate_name": "Dana", "position": "Backend", "level": "entry" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(session["status"], "in_progress");
    let questions = session["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 4);
    let session_id = session["id"].as_str().unwrap().to_string();
    let q1 = questions[0]["id"].as_str().unwrap().to_string();
    let q2 = questions[1]["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/sessions/{}/assessments/{}", session_id, q1),
        Some(json!({ "answer_notes": "Solid explanation", "score": 4, "feedback": "Good" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["assessments"][0]["score"], 4);
    assert_eq!(updated["assessments"][0]["score_source"], "manual");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/sessions/{}/assessments/{}", session_id, q1),
        Some(json!({ "score": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(
        &app,
        "PATCH",
        &format!("/api/sessions/{}/assessments/{}", session_id, q2),
        Some(json!({ "answer_notes": "Partially right" })),
    )
    .await;
    let (status, scored) = send(
        &app,
        "POST",
        &format!("/api/sessions/{}/assessments/{}/score", session_id, q2),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scored["score"], 3);
    assert_eq!(scored["score_source"], "fallback");

    let (status, completed) = send(
        &app,
        "POST",
        &format!("/api/sessions/{}/complete", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["overall_score"], 3.5);
    assert!(completed["summary"].as_str().unwrap().contains("2 of 4"));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/sessions/{}/complete", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, history) = send(&app, "GET", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["candidate_name"], "Dana");
    assert_eq!(history[0]["question_count"], 4);

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, err) = send(&app, "GET", &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(err["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path().to_path_buf());

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "candidate_name": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "candidate_name": "Eve" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("No questions"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/question-banks",
        Some(json!({ "name": "notes.md", "markdown": "just some notes" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/sample",
        Some(json!({
            "question_count": 3,
            "bank_ids": ["6f1c2a4e-9d7b-4c1e-8f3a-2b5d6e7f8a9b"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/question-banks/6f1c2a4e-9d7b-4c1e-8f3a-2b5d6e7f8a9b",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sample_from_small_pool_returns_everything() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path().to_path_buf());
    send(
        &app,
        "POST",
        "/api/question-banks",
        Some(json!({
            "name": "tiny",
            "week_number": 5,
            "markdown": "### Q1: One\n### Q2: Two\n### Q3: Three\n"
        })),
    )
    .await;

    let (status, preview) = send(
        &app,
        "POST",
        "/api/sample",
        Some(json!({ "question_count": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["count"], 3);
}

#[tokio::test]
async fn banks_sharing_a_week_are_all_sampled() {
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app(dir.path().to_path_buf());
    for name in ["week-1-part-a.md", "week-1-part-b.md"] {
        let (status, bank) = send(
            &app,
            "POST",
            "/api/question-banks",
            Some(json!({ "name": name, "markdown": WEEK_ONE })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(bank["week_number"], 1);
    }

    let (status, preview) = send(
        &app,
        "POST",
        "/api/sample",
        Some(json!({ "question_count": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["count"], 12);
}
