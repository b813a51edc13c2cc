use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::Product;
use crate::services::product_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/recommended", get(get_recommended))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedParams {
    /// Comma separated risk rating tags, e.g. `3,4`
    #[serde(default)]
    pub risk_rating: String,
}

pub async fn get_recommended(
    State(state): State<AppState>,
    Query(params): Query<RecommendedParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    info!("GET /api/products/recommended?riskRating={}", params.risk_rating);
    let tags: Vec<String> = params
        .risk_rating
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    Ok(Json(product_service::recommended(state.api.as_ref(), &tags).await?))
}
