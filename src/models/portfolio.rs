use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account-level totals from `/customer/v1/customers/{id}/portfolio/latest`.
///
/// Per-currency amounts (`totalNavSGD`, `depositAmountUSD`, ...) stay in
/// `amounts`; see [`CurrencyPosition::from_amounts`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_asset_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_deposit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_withdrawal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_loss_percentage: Option<f64>,
    #[serde(flatten)]
    pub amounts: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default)]
    pub no_of_shares: f64,
    #[serde(flatten)]
    pub amounts: HashMap<String, Value>,
}

/// One product held by a customer, from `.../portfolio/details`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHolding {
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_name: Option<String>,
    #[serde(default)]
    pub class_details: Vec<ClassDetail>,
    #[serde(flatten)]
    pub amounts: HashMap<String, Value>,
}

impl PortfolioHolding {
    pub fn display_name(&self) -> &str {
        match (&self.fund_name, self.product_name.is_empty()) {
            (Some(fund_name), true) => fund_name,
            _ => &self.product_name,
        }
    }
}

/// Value, net invested amount and gain in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPosition {
    pub currency: String,
    pub value: f64,
    pub deposit: f64,
    pub withdrawal: f64,
    /// Deposits minus withdrawals.
    pub invested: f64,
    pub profit_loss: f64,
}

impl CurrencyPosition {
    /// Reads `totalNav{CCY}`, `depositAmount{CCY}` and `withdrawAmount{CCY}`;
    /// missing amounts count as zero.
    pub fn from_amounts(amounts: &HashMap<String, Value>, currency: &str) -> Self {
        let currency = currency.to_uppercase();
        let amount = |prefix: &str| {
            amounts
                .get(&format!("{}{}", prefix, currency))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        };

        let value = amount("totalNav");
        let deposit = amount("depositAmount");
        let withdrawal = amount("withdrawAmount");
        let invested = deposit - withdrawal;
        Self {
            currency,
            value,
            deposit,
            withdrawal,
            invested,
            profit_loss: value - invested,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOverview {
    #[serde(flatten)]
    pub summary: PortfolioSummary,
    pub position: CurrencyPosition,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingView {
    pub product_id: String,
    pub name: String,
    pub class_details: Vec<ClassDetail>,
    pub position: CurrencyPosition,
}
