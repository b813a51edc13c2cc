use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{NewOrder, Order, OrderPage, OrderType};
use crate::services::order_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route("/search", get(search_orders))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearchParams {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(rename = "type", default)]
    pub order_type: Option<String>,
}

fn default_page_size() -> u32 {
    order_service::DEFAULT_PAGE_SIZE
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    info!("GET /api/orders");
    Ok(Json(order_service::list(state.api.as_ref()).await?))
}

/// GET /api/orders/search?pageNumber=0&pageSize=10&ownerId=c1&type=REDEMPTION
pub async fn search_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderSearchParams>,
) -> Result<Json<OrderPage>, AppError> {
    info!(
        "GET /api/orders/search - page {} size {}",
        params.page_number, params.page_size
    );
    let order_type = params
        .order_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::parse::<OrderType>)
        .transpose()?;

    let page = order_service::find(
        state.api.as_ref(),
        params.page_number,
        params.page_size,
        params.owner_id.as_deref().filter(|id| !id.is_empty()),
        order_type,
    )
    .await?;
    Ok(Json(page))
}

#[axum::debug_handler]
pub async fn place_order(
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    info!(
        "POST /api/orders - {} of product {} for customer {}",
        order.order_type.as_str(),
        order.product_id,
        order.owner_id
    );
    let saved = order_service::place(state.api.as_ref(), &order).await.map_err(|e| {
        warn!("Order for customer {} rejected: {}", order.owner_id, e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(saved)))
}
