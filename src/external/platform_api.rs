use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Fund, FormTemplate, NewOrder, Order, OrderPage, PerformancePoint, PerformanceType, PerformanceTypeInfo,
    PortfolioHolding, PortfolioSummary, Product, RiskProfileRecord, SubmitRiskProfile,
};

#[derive(Debug, Error)]
pub enum PlatformApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

/// The remote platform REST API: templates, customer risk profiles and
/// portfolios, fund performance, products and orders.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn latest_published_template(&self, key: &str) -> Result<FormTemplate, PlatformApiError>;

    async fn form_template(&self, id: &str) -> Result<FormTemplate, PlatformApiError>;

    async fn save_risk_profile(
        &self,
        customer_id: &str,
        payload: &SubmitRiskProfile,
    ) -> Result<RiskProfileRecord, PlatformApiError>;

    /// Newest first.
    async fn list_risk_profiles(&self, customer_id: &str) -> Result<Vec<RiskProfileRecord>, PlatformApiError>;

    async fn delete_risk_profile(&self, customer_id: &str, risk_profile_id: &str) -> Result<(), PlatformApiError>;

    /// Keyed by performance type wire name (`"ONE_MONTH"`, ...).
    async fn performance_types(&self, fund_id: &str) -> Result<HashMap<String, PerformanceTypeInfo>, PlatformApiError>;

    async fn performance(
        &self,
        fund_id: &str,
        performance_type: PerformanceType,
    ) -> Result<Vec<PerformancePoint>, PlatformApiError>;

    /// `query` uses the platform's RSQL-like filter syntax.
    async fn query_products(&self, query: &str) -> Result<Vec<Product>, PlatformApiError>;

    async fn query_funds(&self, query: &str) -> Result<Vec<Fund>, PlatformApiError>;

    async fn portfolio_performance_types(
        &self,
        customer_id: &str,
    ) -> Result<HashMap<String, PerformanceTypeInfo>, PlatformApiError>;

    async fn latest_portfolio_summary(&self, customer_id: &str) -> Result<PortfolioSummary, PlatformApiError>;

    async fn portfolio_performance(
        &self,
        customer_id: &str,
        performance_type: PerformanceType,
    ) -> Result<Vec<PerformancePoint>, PlatformApiError>;

    async fn portfolio_holdings(&self, customer_id: &str) -> Result<Vec<PortfolioHolding>, PlatformApiError>;

    /// Newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, PlatformApiError>;

    /// Newest first; `page_number` is zero-based.
    async fn find_orders(
        &self,
        page_number: u32,
        page_size: u32,
        query: Option<&str>,
    ) -> Result<OrderPage, PlatformApiError>;

    async fn save_order(&self, order: &NewOrder) -> Result<Order, PlatformApiError>;
}
