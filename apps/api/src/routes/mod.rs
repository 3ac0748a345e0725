pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::reports::handlers as report_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate interview
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/start",
            post(handlers::handle_start).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/sessions/:id/answer", post(handlers::handle_answer))
        .route("/api/v1/sessions/:id/end", post(handlers::handle_end))
        // Operator view
        .route(
            "/api/v1/operator/reports",
            post(report_handlers::handle_list_reports),
        )
        .route(
            "/api/v1/operator/reports/:name",
            post(report_handlers::handle_get_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use bytes::Bytes;
    use futures::stream;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::interview::scoring::InterviewLimits;
    use crate::llm_client::retry::RetryPolicy;
    use crate::llm_client::testing::ScriptedGenerator;

    const BOUNDARY: &str = "skillview-test-boundary";

    fn test_config() -> Config {
        Config {
            anthropic_api_key: "test-key".into(),
            port: 0,
            rust_log: "debug".into(),
            interviewer_name: "Alex".into(),
            operator_username: "admin".into(),
            operator_password: "hr123".into(),
            max_upload_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
            retry_policy: RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::ZERO,
            },
            limits: InterviewLimits::default(),
        }
    }

    fn app() -> Router {
        app_with(test_config())
    }

    fn app_with(config: Config) -> Router {
        let generator = Arc::new(ScriptedGenerator::responding(|prompt| {
            if prompt.contains("Evaluate their answer") {
                "Score: 6\nReasonable.".to_string()
            } else if prompt.contains("performance summary") {
                "**Overall Impression**\nGood.".to_string()
            } else {
                "How would you remove duplicates from a column?".to_string()
            }
        }));
        build_router(AppState::new(config, generator))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    fn start_form(uri: &str, name: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n--{BOUNDARY}--\r\n"
        );
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Name first, then a resume of `resume_len` bytes, streamed in small chunks.
    fn start_form_with_resume(uri: &str, name: &str, resume_len: usize) -> Request<Body> {
        let head = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; \
             filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
        );
        let mut chunks = vec![Bytes::from(head)];
        chunks.extend(
            vec![b'x'; resume_len]
                .chunks(256)
                .map(Bytes::copy_from_slice),
        );
        chunks.push(Bytes::from(format!("\r\n--{BOUNDARY}--\r\n")));

        let body = Body::from_stream(stream::iter(
            chunks.into_iter().map(Ok::<_, std::io::Error>),
        ));
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send(app, post_empty("/api/v1/sessions")).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_new_session_is_initial() {
        let app = app();
        let id = create_session(&app).await;

        let request = Request::get(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "initial");
        assert_eq!(body["interviewer_name"], "Alex");
        assert_eq!(body["turns"], json!([]));
    }

    #[tokio::test]
    async fn test_full_interview_over_http() {
        let app = app();
        let id = create_session(&app).await;

        let start = start_form(&format!("/api/v1/sessions/{id}/start"), "Alice");
        let (status, body) = send(&app, start).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["phase"], "in_progress");
        assert_eq!(body["session"]["turns"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/answer"),
                json!({ "answer": "Remove Duplicates under the Data tab" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["question_count"], 1);
        assert_eq!(body["session"]["scores"], json!([{ "scored": 6 }]));

        let end = post_empty(&format!("/api/v1/sessions/{id}/end"));
        let (status, body) = send(&app, end).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["phase"], "done");
        assert_eq!(body["session"]["report"], "**Overall Impression**\nGood.");

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/operator/reports",
                json!({ "username": "admin", "password": "hr123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reports"][0]["candidate_name"], "Alice");

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/operator/reports/Alice",
                json!({ "username": "admin", "password": "hr123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"], "**Overall Impression**\nGood.");

        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body["sessions"], 1);
        assert_eq!(body["archived_reports"], 1);
    }

    #[tokio::test]
    async fn test_start_without_name_is_rejected() {
        let app = app();
        let id = create_session(&app).await;

        let start = start_form(&format!("/api/v1/sessions/{id}/start"), "");
        let (status, body) = send(&app, start).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let request = Request::get(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body["phase"], "initial");
        assert_eq!(body["question_count"], 0);
    }

    #[tokio::test]
    async fn test_oversized_resume_still_starts_interview() {
        let app = app_with(Config {
            max_upload_bytes: 1024,
            ..test_config()
        });
        let id = create_session(&app).await;

        let start = start_form_with_resume(&format!("/api/v1/sessions/{id}/start"), "Alice", 4096);
        let (status, body) = send(&app, start).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["phase"], "in_progress");
        assert_eq!(body["session"]["candidate_name"], "Alice");
        assert_eq!(body["notices"][0]["level"], "error");
        assert!(body["notices"][0]["message"]
            .as_str()
            .unwrap()
            .starts_with("Error reading PDF"));
    }

    #[tokio::test]
    async fn test_resume_within_limit_is_read() {
        let app = app();
        let id = create_session(&app).await;

        let start = start_form_with_resume(&format!("/api/v1/sessions/{id}/start"), "Alice", 4096);
        let (status, body) = send(&app, start).await;

        // not a real PDF, so extraction fails after the upload arrived whole
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["phase"], "in_progress");
        assert_eq!(body["notices"][0]["level"], "error");
    }

    #[tokio::test]
    async fn test_answer_before_start_conflicts() {
        let app = app();
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/answer"),
                json!({ "answer": "hello" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "PHASE_CONFLICT");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app();
        let uri = format!("/api/v1/sessions/{}/end", uuid::Uuid::new_v4());
        let (status, _) = send(&app, post_empty(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let app = app();
        let id = create_session(&app).await;

        let request = Request::delete(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let request = Request::get(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_operator_login_rejects_bad_credentials() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/operator/reports",
                json!({ "username": "admin", "password": "wrong" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_operator_unknown_candidate_is_not_found() {
        let app = app();
        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/operator/reports/Nobody",
                json!({ "username": "admin", "password": "hr123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_operator_sees_empty_archive() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/operator/reports",
                json!({ "username": "admin", "password": "hr123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reports"], json!([]));
    }
}
