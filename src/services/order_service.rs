use tracing::{error, info};

use crate::errors::AppError;
use crate::external::platform_api::PlatformApi;
use crate::models::{NewOrder, Order, OrderPage, OrderType};
use crate::services::rsql;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// `ownerId==c1;type==REDEMPTION`, or `None` when nothing is filtered.
pub fn order_query(owner_id: Option<&str>, order_type: Option<OrderType>) -> Result<Option<String>, AppError> {
    let mut clauses = Vec::new();
    if let Some(owner_id) = owner_id {
        clauses.push(format!("ownerId=={}", rsql::literal("ownerId", owner_id)?));
    }
    if let Some(order_type) = order_type {
        clauses.push(format!("type=={}", order_type.as_str()));
    }
    Ok((!clauses.is_empty()).then(|| clauses.join(";")))
}

pub async fn list(api: &dyn PlatformApi) -> Result<Vec<Order>, AppError> {
    api.list_orders().await.map_err(|e| {
        error!("Failed to load orders: {}", e);
        AppError::from(e)
    })
}

pub async fn find(
    api: &dyn PlatformApi,
    page_number: u32,
    page_size: u32,
    owner_id: Option<&str>,
    order_type: Option<OrderType>,
) -> Result<OrderPage, AppError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(AppError::Validation(format!(
            "pageSize must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let query = order_query(owner_id, order_type)?;
    api.find_orders(page_number, page_size, query.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to search orders (page {}): {}", page_number, e);
            AppError::from(e)
        })
}

/// An order names its owner and product and carries exactly one positive
/// quantity: a cash `amount` or a number of `unit`s.
pub fn validate(order: &NewOrder) -> Result<(), AppError> {
    if order.owner_id.trim().is_empty() {
        return Err(AppError::Validation("ownerId is required".to_string()));
    }
    if order.product_id.trim().is_empty() {
        return Err(AppError::Validation("productId is required".to_string()));
    }

    match (order.amount, order.unit) {
        (Some(q), None) | (None, Some(q)) if q.is_finite() && q > 0.0 => Ok(()),
        (Some(_), Some(_)) => Err(AppError::Validation("Give either amount or unit, not both".to_string())),
        _ => Err(AppError::Validation("Order quantity must be positive".to_string())),
    }
}

pub async fn place(api: &dyn PlatformApi, order: &NewOrder) -> Result<Order, AppError> {
    validate(order)?;

    let saved = api.save_order(order).await.map_err(|e| {
        error!("Failed to place {} order for customer {}: {}", order.order_type.as_str(), order.owner_id, e);
        AppError::from(e)
    })?;
    info!("Placed {} order {} for customer {}", order.order_type.as_str(), saved.id, order.owner_id);
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redemption(amount: Option<f64>, unit: Option<f64>) -> NewOrder {
        NewOrder {
            order_type: OrderType::Redemption,
            owner_id: "cust-1".to_string(),
            product_id: "prod-9".to_string(),
            class_id: Some("A".to_string()),
            currency: Some("SGD".to_string()),
            amount,
            unit,
        }
    }

    #[test]
    fn test_query_joins_filters() {
        assert_eq!(
            order_query(Some("cust-1"), Some(OrderType::Redemption)).unwrap().as_deref(),
            Some("ownerId==cust-1;type==REDEMPTION")
        );
        assert_eq!(order_query(None, Some(OrderType::Subscription)).unwrap().as_deref(), Some("type==SUBSCRIPTION"));
        assert_eq!(order_query(None, None).unwrap(), None);
        assert!(order_query(Some("x;ownerId==y"), None).is_err());
    }

    #[test]
    fn test_order_needs_one_positive_quantity() {
        assert!(validate(&redemption(Some(100.0), None)).is_ok());
        assert!(validate(&redemption(None, Some(2.5))).is_ok());
        assert!(validate(&redemption(None, None)).is_err());
        assert!(validate(&redemption(Some(0.0), None)).is_err());
        assert!(validate(&redemption(Some(-5.0), None)).is_err());
        assert!(validate(&redemption(Some(1.0), Some(1.0))).is_err());

        let mut ownerless = redemption(Some(1.0), None);
        ownerless.owner_id = " ".to_string();
        assert!(validate(&ownerless).is_err());
    }
}
