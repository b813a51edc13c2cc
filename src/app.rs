use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{assessments, customers, funds, health, orders, products};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/assessments", assessments::router())
        .nest("/api/customers", customers::router())
        .nest("/api/funds", funds::router())
        .nest("/api/orders", orders::router())
        .nest("/api/products", products::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
