use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::reports::archive::ArchivedReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OperatorLogin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<ArchivedReport>,
}

/// POST /api/v1/operator/reports
///
/// Returns every archived report once the operator credentials match.
pub async fn handle_list_reports(
    State(state): State<AppState>,
    Json(login): Json<OperatorLogin>,
) -> Result<Json<ReportListResponse>, AppError> {
    if !state.operator.verify(&login.username, &login.password) {
        warn!("Rejected operator login for '{}'", login.username);
        return Err(AppError::Unauthorized);
    }

    let reports = state.archive.list().await;
    info!("Operator '{}' fetched {} reports", login.username, reports.len());
    Ok(Json(ReportListResponse { reports }))
}

/// POST /api/v1/operator/reports/:name
///
/// Returns one candidate's report; 404 if none has been archived.
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(candidate_name): Path<String>,
    Json(login): Json<OperatorLogin>,
) -> Result<Json<ArchivedReport>, AppError> {
    if !state.operator.verify(&login.username, &login.password) {
        warn!("Rejected operator login for '{}'", login.username);
        return Err(AppError::Unauthorized);
    }

    state
        .archive
        .get(&candidate_name)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No report for {candidate_name}")))
}
