use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::assessment_flow::{AssessmentContext, AssessmentSnapshot};
use crate::services::assessment_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_assessment))
        .route("/:session_id", get(get_assessment).delete(abandon_assessment))
        .route("/:session_id/answer", put(answer_question))
        .route("/:session_id/next", post(next_question))
        .route("/:session_id/back", post(previous_question))
        .route("/:session_id/retry", post(retry_submission))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAssessmentRequest {
    pub customer_id: String,
    /// Present when the assessment gates a subscription.
    #[serde(default)]
    pub product_id: Option<String>,
    /// Overrides the configured template key.
    #[serde(default)]
    pub template_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub value: String,
}

#[axum::debug_handler]
pub async fn start_assessment(
    State(state): State<AppState>,
    Json(request): Json<StartAssessmentRequest>,
) -> Result<(StatusCode, Json<AssessmentSnapshot>), AppError> {
    info!("POST /api/assessments - Starting assessment for customer {}", request.customer_id);

    if request.customer_id.trim().is_empty() {
        return Err(AppError::Validation("customerId is required".to_string()));
    }

    let template_key = request
        .template_key
        .clone()
        .unwrap_or_else(|| state.config.assessment_template_key.clone());
    let context = AssessmentContext {
        customer_id: request.customer_id,
        product_id: request.product_id,
    };

    let snapshot = assessment_service::start(state.api.as_ref(), &state.sessions, context, &template_key)
        .await
        .map_err(|e| {
            error!("Failed to start assessment with template {}: {}", template_key, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentSnapshot>, AppError> {
    info!("GET /api/assessments/{}", session_id);
    Ok(Json(assessment_service::current(&state.sessions, session_id)?))
}

pub async fn answer_question(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AssessmentSnapshot>, AppError> {
    info!("PUT /api/assessments/{}/answer", session_id);
    let snapshot = assessment_service::answer(&state.sessions, session_id, &request.value).map_err(|e| {
        warn!("Rejected answer for session {}: {}", session_id, e);
        e
    })?;
    Ok(Json(snapshot))
}

pub async fn next_question(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentSnapshot>, AppError> {
    info!("POST /api/assessments/{}/next", session_id);
    let snapshot = assessment_service::advance(&state.api, &state.sessions, session_id)
        .await
        .map_err(|e| {
            warn!("Could not advance session {}: {}", session_id, e);
            e
        })?;
    Ok(Json(snapshot))
}

pub async fn previous_question(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentSnapshot>, AppError> {
    info!("POST /api/assessments/{}/back", session_id);
    Ok(Json(assessment_service::back(&state.sessions, session_id)?))
}

pub async fn retry_submission(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AssessmentSnapshot>, AppError> {
    info!("POST /api/assessments/{}/retry", session_id);
    let snapshot = assessment_service::retry(&state.api, &state.sessions, session_id)
        .await
        .map_err(|e| {
            warn!("Could not retry submission for session {}: {}", session_id, e);
            e
        })?;
    Ok(Json(snapshot))
}

pub async fn abandon_assessment(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/assessments/{}", session_id);
    assessment_service::abandon(&state.sessions, session_id)?;
    Ok(StatusCode::NO_CONTENT)
}
