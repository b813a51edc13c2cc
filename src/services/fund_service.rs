use std::collections::HashMap;

use tracing::{error, info};

use crate::config::ChartLimits;
use crate::errors::AppError;
use crate::external::platform_api::PlatformApi;
use crate::models::{
    AxisLabel, ChartData, ChartValue, Fund, PerformancePoint, PerformanceType, PerformanceTypeInfo,
    PerformanceTypeOption,
};
use crate::services::{chart_sampler, rsql};

/// Ranges with fewer points than this are not offered.
pub const MIN_PERFORMANCE_DATA_SIZE: u32 = 3;

const Y_AXIS_TICKS: usize = 4;

pub fn filter_performance_types(info: &HashMap<String, PerformanceTypeInfo>) -> Vec<PerformanceTypeOption> {
    PerformanceType::ALL
        .into_iter()
        .filter(|t| {
            info.get(t.as_str())
                .and_then(|i| i.data_size)
                .map(|size| size >= MIN_PERFORMANCE_DATA_SIZE)
                .unwrap_or(false)
        })
        .map(PerformanceTypeOption::from)
        .collect()
}

/// Fund detail by id, looked up through the fund query endpoint.
pub async fn fund(api: &dyn PlatformApi, fund_id: &str) -> Result<Fund, AppError> {
    let query = format!("id=={}", rsql::literal("fund id", fund_id)?);
    let funds = api.query_funds(&query).await.map_err(|e| {
        error!("Failed to load fund {}: {}", fund_id, e);
        AppError::from(e)
    })?;
    funds.into_iter().next().ok_or(AppError::NotFound)
}

pub async fn available_performance_types(
    api: &dyn PlatformApi,
    fund_id: &str,
) -> Result<Vec<PerformanceTypeOption>, AppError> {
    let info = api.performance_types(fund_id).await.map_err(|e| {
        error!("Failed to load performance types for fund {}: {}", fund_id, e);
        AppError::from(e)
    })?;
    Ok(filter_performance_types(&info))
}

/// Turns a raw performance series into a bounded, render-ready chart.
pub fn build_chart(
    series: &[PerformancePoint],
    performance_type: PerformanceType,
    currency: &str,
    limits: ChartLimits,
) -> ChartData {
    let sampled = chart_sampler::sample_points(series, limits.max_points);
    let len = sampled.len();

    let values: Vec<ChartValue> = sampled
        .iter()
        .enumerate()
        .map(|(i, point)| ChartValue {
            value: point.performance,
            label: point.date.clone(),
            unit_value: point.unit_value(currency),
            unit_currency: currency.to_string(),
            x: chart_sampler::x_position(i, len),
        })
        .collect();

    let value_range = chart_sampler::value_range(values.iter().map(|v| v.value));

    let label_indices = chart_sampler::sample_label_indices(len, limits.max_labels);
    let raw_labels: Vec<&str> = label_indices.iter().map(|&i| sampled[i].date.as_str()).collect();
    let labels = chart_sampler::format_axis_labels(&raw_labels)
        .into_iter()
        .zip(&label_indices)
        .map(|(text, &i)| AxisLabel { text, x: chart_sampler::x_position(i, len) })
        .collect();

    let ticks = if values.is_empty() {
        Vec::new()
    } else {
        chart_sampler::axis_ticks(value_range, Y_AXIS_TICKS)
    };

    ChartData { performance_type, values, value_range, labels, ticks }
}

pub async fn chart(
    api: &dyn PlatformApi,
    fund_id: &str,
    performance_type: PerformanceType,
    currency: &str,
    limits: ChartLimits,
) -> Result<ChartData, AppError> {
    let series = api.performance(fund_id, performance_type).await.map_err(|e| {
        error!("Failed to load {} performance for fund {}: {}", performance_type.as_str(), fund_id, e);
        AppError::from(e)
    })?;

    let chart = build_chart(&series, performance_type, currency, limits);
    info!(
        "Built {} chart for fund {}: {} of {} points",
        performance_type.label(),
        fund_id,
        chart.values.len(),
        series.len()
    );
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn daily_series(len: usize) -> Vec<PerformancePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..len)
            .map(|i| {
                let date = start + Duration::days(i as i64);
                PerformancePoint::new(date.format("%Y-%m-%d").to_string(), i as f64 / 100.0)
            })
            .collect()
    }

    #[test]
    fn test_types_need_enough_data() {
        let info = HashMap::from([
            ("ONE_YEAR".to_string(), PerformanceTypeInfo { data_size: Some(250) }),
            ("ONE_MONTH".to_string(), PerformanceTypeInfo { data_size: Some(3) }),
            ("THREE_MONTHS".to_string(), PerformanceTypeInfo { data_size: Some(2) }),
            ("SIX_MONTHS".to_string(), PerformanceTypeInfo { data_size: None }),
            ("UNKNOWN".to_string(), PerformanceTypeInfo { data_size: Some(99) }),
        ]);

        let types: Vec<PerformanceType> = filter_performance_types(&info).into_iter().map(|t| t.value).collect();
        assert_eq!(types, vec![PerformanceType::OneMonth, PerformanceType::OneYear]);
    }

    #[test]
    fn test_long_series_is_bounded() {
        let series = daily_series(365);
        let chart = build_chart(&series, PerformanceType::OneYear, "SGD", ChartLimits::default());

        // stride ceil(365 / 50) = 8 -> 46 points
        assert_eq!(chart.values.len(), 46);
        assert_eq!(chart.values[1].label, series[8].date);
        assert_eq!(chart.labels.len(), 3);
        assert_eq!(chart.ticks.len(), 4);
        assert_eq!(chart.values.last().map(|v| v.x), Some(1.0));
    }

    #[test]
    fn test_labels_switch_to_days_within_one_month() {
        let series = daily_series(20);
        let chart = build_chart(&series, PerformanceType::OneMonth, "SGD", ChartLimits::default());

        // q = 5, r = 0 -> indices 5, 10, 15
        let texts: Vec<&str> = chart.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["6 Jan 2024", "11 Jan 2024", "16 Jan 2024"]);
        assert!((chart.labels[0].x - 5.0 / 19.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series_has_no_ticks() {
        let chart = build_chart(&[], PerformanceType::OneMonth, "SGD", ChartLimits::default());
        assert!(chart.values.is_empty());
        assert!(chart.labels.is_empty());
        assert!(chart.ticks.is_empty());
        assert_eq!(chart.value_range, [0.0, 0.0]);
    }

    #[test]
    fn test_single_point_chart() {
        let chart = build_chart(&daily_series(1), PerformanceType::OneMonth, "SGD", ChartLimits::default());
        assert_eq!(chart.values.len(), 1);
        assert_eq!(chart.values[0].x, 0.0);
        assert_eq!(chart.labels.len(), 1);
        assert_eq!(chart.labels[0].text, "Jan 2024");
    }
}
