use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Time range keys understood by the fund performance endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceType {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
    SinceInception,
}

impl PerformanceType {
    /// Display order of the range selector.
    pub const ALL: [PerformanceType; 6] = [
        PerformanceType::OneMonth,
        PerformanceType::ThreeMonths,
        PerformanceType::SixMonths,
        PerformanceType::OneYear,
        PerformanceType::ThreeYears,
        PerformanceType::SinceInception,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceType::OneMonth => "ONE_MONTH",
            PerformanceType::ThreeMonths => "THREE_MONTHS",
            PerformanceType::SixMonths => "SIX_MONTHS",
            PerformanceType::OneYear => "ONE_YEAR",
            PerformanceType::ThreeYears => "THREE_YEARS",
            PerformanceType::SinceInception => "SINCE_INCEPTION",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceType::OneMonth => "1M",
            PerformanceType::ThreeMonths => "3M",
            PerformanceType::SixMonths => "6M",
            PerformanceType::OneYear => "1Y",
            PerformanceType::ThreeYears => "3Y",
            PerformanceType::SinceInception => "All",
        }
    }
}

impl std::str::FromStr for PerformanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PerformanceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown performance type: {}", s))
    }
}

/// Per-range metadata from `/product/v1/funds/{id}/performance-types`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTypeInfo {
    #[serde(default)]
    pub data_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTypeOption {
    pub value: PerformanceType,
    pub label: String,
}

impl From<PerformanceType> for PerformanceTypeOption {
    fn from(value: PerformanceType) -> Self {
        Self { value, label: value.label().to_string() }
    }
}

/// One dated observation of a fund's performance series.
///
/// NAV-per-share fields are keyed by currency (`navPerShareSgd`,
/// `navPerShareUsd`, ...) and kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub date: String,
    #[serde(default, alias = "value", deserialize_with = "null_as_zero")]
    pub performance: f64,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl PerformancePoint {
    pub fn new(date: impl Into<String>, performance: f64) -> Self {
        Self { date: date.into(), performance, extra: HashMap::new() }
    }

    pub fn unit_value(&self, currency: &str) -> f64 {
        self.extra
            .get(&nav_per_share_key(currency))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }
}

/// Gaps in a series arrive as `null`; they plot at zero.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// `"SGD"` -> `"navPerShareSgd"`.
fn nav_per_share_key(currency: &str) -> String {
    let mut chars = currency.chars();
    let capitalized: String = match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
        None => String::new(),
    };
    format!("navPerShare{}", capitalized)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartValue {
    pub value: f64,
    pub label: String,
    pub unit_value: f64,
    pub unit_currency: String,
    /// Horizontal position in `[0, 1]`.
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub text: String,
    /// Horizontal position in `[0, 1]`.
    pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    /// Vertical position in `[0, 1]`, 0 at the bottom.
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub performance_type: PerformanceType,
    pub values: Vec<ChartValue>,
    pub value_range: [f64; 2],
    pub labels: Vec<AxisLabel>,
    pub ticks: Vec<AxisTick>,
}
