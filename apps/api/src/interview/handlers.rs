use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::SessionView;
use crate::notice::{Notice, Notices};
use crate::resume::ResumeUpload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// Body of every interview action: the updated session plus whatever
/// warnings or errors came up while producing it.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub session: SessionView,
    pub notices: Vec<Notice>,
}

impl ActionResponse {
    fn new(session: SessionView, notices: Notices) -> Self {
        Self {
            session,
            notices: notices.into_vec(),
        }
    }
}

/// Fields accepted by the start action.
#[derive(Debug, Default)]
struct StartForm {
    name: Option<String>,
    resume: Option<ResumeUpload>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let handle = state.sessions.create(&state.config.interviewer_name).await;
    let view = handle.lock().await.view();
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let view = handle.lock().await.view();
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/start
///
/// Multipart form: `name` (required), `resume` (optional PDF).
pub async fn handle_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ActionResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let form = read_start_form(multipart).await?;

    let mut session = handle.lock().await;
    let notices = state
        .engine
        .start(
            &mut session,
            form.name.as_deref().unwrap_or_default(),
            form.resume,
        )
        .await?;
    Ok(Json(ActionResponse::new(session.view(), notices)))
}

/// POST /api/v1/sessions/:id/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let notices = state.engine.answer(&mut session, &request.answer).await?;
    Ok(Json(ActionResponse::new(session.view(), notices)))
}

/// POST /api/v1/sessions/:id/end
pub async fn handle_end(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let notices = state.engine.end(&mut session).await?;
    Ok(Json(ActionResponse::new(session.view(), notices)))
}

/// Reads the start form. A broken upload does not reject the request: once
/// `name` is in hand, any read failure is handed on as an unreadable resume.
async fn read_start_form(mut multipart: Multipart) -> Result<StartForm, AppError> {
    let mut form = StartForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if form.name.is_some() => {
                warn!("Resume upload could not be read: {e}");
                form.resume = Some(ResumeUpload::Unreadable(e.to_string()));
                break;
            }
            Err(e) => return Err(AppError::Validation(format!("Invalid form data: {e}"))),
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid name field: {e}")))?;
                form.name = Some(name);
            }
            Some("resume") => match field.bytes().await {
                Ok(pdf) => form.resume = Some(ResumeUpload::Pdf(pdf)),
                Err(e) => {
                    warn!("Resume upload could not be read: {e}");
                    form.resume = Some(ResumeUpload::Unreadable(e.to_string()));
                    break;
                }
            },
            other => debug!("Ignoring unexpected form field {other:?}"),
        }
    }

    Ok(form)
}
