use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::{
    ChartData, HoldingView, PerformanceType, PerformanceTypeOption, PortfolioOverview, Product,
    RiskProfileRecord, RiskProfileView,
};
use crate::services::{portfolio_service, product_service, risk_profile_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:customer_id/risk-profile", get(get_risk_profile))
        .route("/:customer_id/risk-profile/preference", post(set_risk_preference))
        .route("/:customer_id/risk-profiles", get(list_risk_profiles))
        .route("/:customer_id/risk-profiles/:risk_profile_id", delete(delete_risk_profile))
        .route("/:customer_id/recommended-products", get(get_recommended_products))
        .route("/:customer_id/portfolio", get(get_portfolio_overview))
        .route("/:customer_id/portfolio/performance-types", get(get_portfolio_performance_types))
        .route("/:customer_id/portfolio/chart", get(get_portfolio_chart))
        .route("/:customer_id/portfolio/holdings", get(get_portfolio_holdings))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRequest {
    pub template_id: String,
    pub profile_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrencyParams {
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct PortfolioChartParams {
    #[serde(rename = "type", default)]
    pub performance_type: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "SGD".to_string()
}

/// GET /api/customers/:customer_id/risk-profile
///
/// Latest persisted profile with its band resolved. A 200 with
/// `profile: null` means the score matched no band.
pub async fn get_risk_profile(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<RiskProfileView>, AppError> {
    info!("GET /api/customers/{}/risk-profile", customer_id);
    risk_profile_service::latest(state.api.as_ref(), &customer_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

pub async fn list_risk_profiles(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<RiskProfileRecord>>, AppError> {
    info!("GET /api/customers/{}/risk-profiles", customer_id);
    Ok(Json(risk_profile_service::list(state.api.as_ref(), &customer_id).await?))
}

pub async fn delete_risk_profile(
    State(state): State<AppState>,
    Path((customer_id, risk_profile_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/customers/{}/risk-profiles/{}", customer_id, risk_profile_id);
    risk_profile_service::remove(state.api.as_ref(), &customer_id, &risk_profile_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_risk_preference(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Json(request): Json<PreferenceRequest>,
) -> Result<Json<RiskProfileView>, AppError> {
    info!(
        "POST /api/customers/{}/risk-profile/preference - Selecting {}",
        customer_id, request.profile_id
    );
    let view = risk_profile_service::set_preference(
        state.api.as_ref(),
        &customer_id,
        &request.template_id,
        &request.profile_id,
    )
    .await?;
    Ok(Json(view))
}

pub async fn get_recommended_products(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<Product>>, AppError> {
    info!("GET /api/customers/{}/recommended-products", customer_id);
    Ok(Json(product_service::recommended_for_customer(state.api.as_ref(), &customer_id).await?))
}

pub async fn get_portfolio_overview(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(params): Query<CurrencyParams>,
) -> Result<Json<PortfolioOverview>, AppError> {
    info!("GET /api/customers/{}/portfolio?currency={}", customer_id, params.currency);
    Ok(Json(portfolio_service::overview(state.api.as_ref(), &customer_id, &params.currency).await?))
}

pub async fn get_portfolio_performance_types(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Vec<PerformanceTypeOption>>, AppError> {
    info!("GET /api/customers/{}/portfolio/performance-types", customer_id);
    Ok(Json(portfolio_service::available_performance_types(state.api.as_ref(), &customer_id).await?))
}

/// GET /api/customers/:customer_id/portfolio/chart?type=ONE_YEAR&currency=USD
pub async fn get_portfolio_chart(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(params): Query<PortfolioChartParams>,
) -> Result<Json<ChartData>, AppError> {
    let performance_type = match params.performance_type.as_deref() {
        Some(raw) => raw.parse::<PerformanceType>()?,
        None => PerformanceType::default(),
    };
    info!(
        "GET /api/customers/{}/portfolio/chart - {} in {}",
        customer_id,
        performance_type.as_str(),
        params.currency
    );

    let chart = portfolio_service::chart(
        state.api.as_ref(),
        &customer_id,
        performance_type,
        &params.currency,
        state.config.chart_limits,
    )
    .await?;
    Ok(Json(chart))
}

pub async fn get_portfolio_holdings(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    Query(params): Query<CurrencyParams>,
) -> Result<Json<Vec<HoldingView>>, AppError> {
    info!("GET /api/customers/{}/portfolio/holdings?currency={}", customer_id, params.currency);
    Ok(Json(portfolio_service::holdings(state.api.as_ref(), &customer_id, &params.currency).await?))
}
