use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{ChartData, Fund, PerformanceType, PerformanceTypeOption};
use crate::services::fund_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:fund_id", get(get_fund))
        .route("/:fund_id/performance-types", get(get_performance_types))
        .route("/:fund_id/chart", get(get_chart))
}

#[derive(Debug, Deserialize)]
pub struct ChartQueryParams {
    /// Performance range key (default: ONE_MONTH)
    #[serde(rename = "type", default)]
    pub performance_type: Option<String>,

    /// Currency for NAV-per-share values (default: SGD)
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "SGD".to_string()
}

pub async fn get_fund(
    State(state): State<AppState>,
    Path(fund_id): Path<String>,
) -> Result<Json<Fund>, AppError> {
    info!("GET /api/funds/{}", fund_id);
    Ok(Json(fund_service::fund(state.api.as_ref(), &fund_id).await?))
}

pub async fn get_performance_types(
    State(state): State<AppState>,
    Path(fund_id): Path<String>,
) -> Result<Json<Vec<PerformanceTypeOption>>, AppError> {
    info!("GET /api/funds/{}/performance-types", fund_id);
    Ok(Json(fund_service::available_performance_types(state.api.as_ref(), &fund_id).await?))
}

/// GET /api/funds/:fund_id/chart
///
/// Example: GET /api/funds/F001/chart?type=ONE_YEAR&currency=USD
pub async fn get_chart(
    State(state): State<AppState>,
    Path(fund_id): Path<String>,
    Query(params): Query<ChartQueryParams>,
) -> Result<Json<ChartData>, AppError> {
    let performance_type = match params.performance_type.as_deref() {
        Some(raw) => raw.parse::<PerformanceType>()?,
        None => PerformanceType::default(),
    };
    info!(
        "GET /api/funds/{}/chart - {} in {}",
        fund_id,
        performance_type.as_str(),
        params.currency
    );

    let chart = fund_service::chart(
        state.api.as_ref(),
        &fund_id,
        performance_type,
        &params.currency,
        state.config.chart_limits,
    )
    .await?;
    Ok(Json(chart))
}
