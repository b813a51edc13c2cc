use tracing::{error, info};

use crate::errors::AppError;
use crate::external::platform_api::PlatformApi;
use crate::models::Product;
use crate::services::{risk_profile_service, rsql};

/// `["3", "4"]` -> `(fund.suitability==3,fund.suitability==4)`.
pub fn suitability_query(rating_tags: &[String]) -> String {
    let clauses: Vec<String> = rating_tags
        .iter()
        .map(|tag| format!("fund.suitability=={}", tag))
        .collect();
    format!("({})", clauses.join(","))
}

/// Active products only, most suitable first.
pub fn rank_recommendations(products: Vec<Product>) -> Vec<Product> {
    let mut active: Vec<Product> = products.into_iter().filter(Product::is_active).collect();
    active.sort_by(|a, b| b.suitability().total_cmp(&a.suitability()));
    active
}

pub async fn recommended(api: &dyn PlatformApi, rating_tags: &[String]) -> Result<Vec<Product>, AppError> {
    if rating_tags.is_empty() {
        return Ok(Vec::new());
    }
    for tag in rating_tags {
        rsql::literal("riskRating", tag)?;
    }

    let query = suitability_query(rating_tags);
    let products = api.query_products(&query).await.map_err(|e| {
        error!("Failed to load recommended products for {}: {}", query, e);
        AppError::from(e)
    })?;
    Ok(rank_recommendations(products))
}

/// Recommendations for the band of the customer's latest risk profile.
pub async fn recommended_for_customer(api: &dyn PlatformApi, customer_id: &str) -> Result<Vec<Product>, AppError> {
    let tags = risk_profile_service::latest(api, customer_id)
        .await?
        .and_then(|view| view.profile)
        .map(|profile| profile.risk_rating)
        .unwrap_or_default();

    if tags.is_empty() {
        info!("Customer {} has no resolved risk profile; no recommendations", customer_id);
    }
    recommended(api, &tags).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Fund;

    fn product(id: &str, active: bool, suitability: Option<f64>) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            product_type: "FUND".to_string(),
            description: None,
            fund: Some(Fund {
                id: format!("fund-{}", id),
                name: id.to_string(),
                currency: "SGD".to_string(),
                nav: None,
                risk_rating: None,
                suitability,
                description: None,
                active,
                factsheet_url: None,
                min_subscription: None,
                min_redemption: None,
                performance_ytd: None,
                performance_since_inception: None,
                case_studies: vec![],
                additional_info: None,
            }),
        }
    }

    #[test]
    fn test_query_lists_every_tag() {
        let tags = vec!["3".to_string(), "4".to_string()];
        assert_eq!(suitability_query(&tags), "(fund.suitability==3,fund.suitability==4)");
    }

    #[test]
    fn test_inactive_products_are_dropped_and_rest_sorted() {
        let mut bare = product("bare", true, None);
        bare.fund = None;
        let ranked = rank_recommendations(vec![
            product("mid", true, Some(3.0)),
            product("off", false, Some(5.0)),
            product("top", true, Some(4.0)),
            product("none", true, None),
            bare,
        ]);

        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "mid", "none"]);
    }
}
