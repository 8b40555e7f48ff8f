//! Axum route handlers for the Matching API.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::engine::reconcile_response;
use crate::models::matching::{MatchResponse, MatchResult};
use crate::models::resume::ResumeData;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_data: ResumeData,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub resume_data: ResumeData,
    pub response: MatchResponse,
}

/// Same envelope shape the backend uses, with reconciled results.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub message: String,
    pub status: u16,
    pub results: Vec<MatchResult>,
}

impl MatchListResponse {
    fn ok(results: Vec<MatchResult>) -> Self {
        Self {
            message: format!("{} matching jobs", results.len()),
            status: 200,
            results,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matching
///
/// Asks the backend for jobs matching the resume, then reconciles the raw
/// search chunks into ranked results. The caller's bearer token is forwarded.
pub async fn handle_match(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchListResponse>, AppError> {
    let response = state
        .backend
        .fetch_matches(&request.resume_data, bearer_token(&headers))
        .await?;

    let results = reconcile_response(&response, &request.resume_data, state.grouper.as_ref())?;
    info!("Reconciled backend response into {} matches", results.len());

    Ok(Json(MatchListResponse::ok(results)))
}

/// POST /api/v1/matching/reconcile
///
/// Reconciles a backend response the caller already fetched.
pub async fn handle_reconcile(
    State(state): State<AppState>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Json<MatchListResponse>, AppError> {
    if request.response.status >= 400 {
        return Err(AppError::Validation(format!(
            "cannot reconcile a failed backend response (status {}): {}",
            request.response.status, request.response.message
        )));
    }

    let results = reconcile_response(
        &request.response,
        &request.resume_data,
        state.grouper.as_ref(),
    )?;

    Ok(Json(MatchListResponse::ok(results)))
}
