use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suitability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factsheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_subscription: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_redemption: Option<f64>,
    #[serde(default, rename = "performanceYTD", skip_serializing_if = "Option::is_none")]
    pub performance_ytd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_since_inception: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub case_studies: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<serde_json::Value>,
}

/// A sellable product wrapping a fund.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub product_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund: Option<Fund>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.fund.as_ref().map(|f| f.active).unwrap_or(false)
    }

    pub fn suitability(&self) -> f64 {
        self.fund.as_ref().and_then(|f| f.suitability).unwrap_or(0.0)
    }
}
