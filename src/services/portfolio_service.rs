use tracing::{error, info};

use crate::config::ChartLimits;
use crate::errors::AppError;
use crate::external::platform_api::PlatformApi;
use crate::models::{
    ChartData, CurrencyPosition, HoldingView, PerformanceType, PerformanceTypeOption, PortfolioHolding,
    PortfolioOverview,
};
use crate::services::fund_service;

/// Portfolio ranges with enough data to chart; same rule as for funds.
pub async fn available_performance_types(
    api: &dyn PlatformApi,
    customer_id: &str,
) -> Result<Vec<PerformanceTypeOption>, AppError> {
    let info = api.portfolio_performance_types(customer_id).await.map_err(|e| {
        error!("Failed to load portfolio performance types for customer {}: {}", customer_id, e);
        AppError::from(e)
    })?;
    Ok(fund_service::filter_performance_types(&info))
}

/// Latest account totals plus the position in `currency`.
pub async fn overview(api: &dyn PlatformApi, customer_id: &str, currency: &str) -> Result<PortfolioOverview, AppError> {
    let summary = api.latest_portfolio_summary(customer_id).await.map_err(|e| {
        error!("Failed to load portfolio summary for customer {}: {}", customer_id, e);
        AppError::from(e)
    })?;
    let position = CurrencyPosition::from_amounts(&summary.amounts, currency);
    Ok(PortfolioOverview { summary, position })
}

pub async fn chart(
    api: &dyn PlatformApi,
    customer_id: &str,
    performance_type: PerformanceType,
    currency: &str,
    limits: ChartLimits,
) -> Result<ChartData, AppError> {
    let series = api
        .portfolio_performance(customer_id, performance_type)
        .await
        .map_err(|e| {
            error!(
                "Failed to load {} portfolio performance for customer {}: {}",
                performance_type.as_str(),
                customer_id,
                e
            );
            AppError::from(e)
        })?;

    let chart = fund_service::build_chart(&series, performance_type, currency, limits);
    info!(
        "Built {} portfolio chart for customer {}: {} of {} points",
        performance_type.label(),
        customer_id,
        chart.values.len(),
        series.len()
    );
    Ok(chart)
}

/// Holdings with money still invested, largest value first.
pub fn rank_holdings(holdings: Vec<PortfolioHolding>, currency: &str) -> Vec<HoldingView> {
    let mut views: Vec<HoldingView> = holdings
        .into_iter()
        .map(|holding| HoldingView {
            position: CurrencyPosition::from_amounts(&holding.amounts, currency),
            name: holding.display_name().to_string(),
            product_id: holding.product_id,
            class_details: holding.class_details,
        })
        .filter(|view| view.position.invested > 0.0)
        .collect();
    views.sort_by(|a, b| b.position.value.total_cmp(&a.position.value));
    views
}

pub async fn holdings(api: &dyn PlatformApi, customer_id: &str, currency: &str) -> Result<Vec<HoldingView>, AppError> {
    let holdings = api.portfolio_holdings(customer_id).await.map_err(|e| {
        error!("Failed to load portfolio holdings for customer {}: {}", customer_id, e);
        AppError::from(e)
    })?;
    Ok(rank_holdings(holdings, currency))
}
