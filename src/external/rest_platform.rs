use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::AppConfig;
use crate::external::platform_api::{PlatformApi, PlatformApiError};
use crate::models::{
    Fund, FormTemplate, NewOrder, Order, OrderPage, PerformancePoint, PerformanceType, PerformanceTypeInfo,
    PortfolioHolding, PortfolioSummary, Product, RiskProfileRecord, SubmitRiskProfile,
};

/// JSON client for the platform REST API.
pub struct RestPlatformApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl RestPlatformApi {
    pub fn new(base_url: Url, token: Option<String>, timeout: Duration) -> Result<Self, PlatformApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlatformApiError::Network(e.to_string()))?;

        Ok(Self { client, base_url, token })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PlatformApiError> {
        Self::new(config.api_base_url.clone(), config.api_token.clone(), config.api_timeout)
    }

    /// Appends `segments` to the base URL's path. Each segment is
    /// percent-encoded, so ids cannot introduce extra path components.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, PlatformApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PlatformApiError::BadResponse(format!("base URL {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, PlatformApiError> {
        let url = self.endpoint(segments)?;

        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            // The identity provider's id token is passed as-is.
            Some(token) => builder.header(reqwest::header::AUTHORIZATION, token),
            None => builder,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, PlatformApiError> {
        let resp = request
            .send()
            .await
            .map_err(|e| PlatformApiError::Network(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => Ok(resp),
            StatusCode::NOT_FOUND => Err(PlatformApiError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(PlatformApiError::RateLimited),
            status => Err(PlatformApiError::BadResponse(format!("API returned status: {}", status))),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, PlatformApiError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| PlatformApiError::Parse(e.to_string()))
    }
}

fn customer_path<'a>(customer_id: &'a str, tail: &[&'a str]) -> Vec<&'a str> {
    let mut segments = vec!["customer", "v1", "customers", customer_id];
    segments.extend_from_slice(tail);
    segments
}

#[async_trait]
impl PlatformApi for RestPlatformApi {
    async fn latest_published_template(&self, key: &str) -> Result<FormTemplate, PlatformApiError> {
        let request = self
            .request(Method::GET, &["common", "v1", "form-templates", "latest"])?
            .query(&[("key", key), ("status", "PUBLISHED")]);
        self.send_json(request).await
    }

    async fn form_template(&self, id: &str) -> Result<FormTemplate, PlatformApiError> {
        let request = self.request(Method::GET, &["common", "v1", "form-templates", id])?;
        self.send_json(request).await
    }

    async fn save_risk_profile(
        &self,
        customer_id: &str,
        payload: &SubmitRiskProfile,
    ) -> Result<RiskProfileRecord, PlatformApiError> {
        let path = customer_path(customer_id, &["risk-profiles"]);
        let request = self.request(Method::POST, &path)?.json(payload);
        self.send_json(request).await
    }

    async fn list_risk_profiles(&self, customer_id: &str) -> Result<Vec<RiskProfileRecord>, PlatformApiError> {
        let path = customer_path(customer_id, &["risk-profiles"]);
        let request = self
            .request(Method::GET, &path)?
            .query(&[("sortOrders", "-createdDate")]);
        self.send_json(request).await
    }

    async fn delete_risk_profile(&self, customer_id: &str, risk_profile_id: &str) -> Result<(), PlatformApiError> {
        let path = customer_path(customer_id, &["risk-profiles", risk_profile_id]);
        self.send(self.request(Method::DELETE, &path)?).await?;
        Ok(())
    }

    async fn performance_types(&self, fund_id: &str) -> Result<HashMap<String, PerformanceTypeInfo>, PlatformApiError> {
        let request = self.request(Method::GET, &["product", "v1", "funds", fund_id, "performance-types"])?;
        self.send_json(request).await
    }

    async fn performance(
        &self,
        fund_id: &str,
        performance_type: PerformanceType,
    ) -> Result<Vec<PerformancePoint>, PlatformApiError> {
        let request = self
            .request(Method::GET, &["product", "v1", "funds", fund_id, "performances"])?
            .query(&[("type", performance_type.as_str())]);
        self.send_json(request).await
    }

    async fn query_products(&self, query: &str) -> Result<Vec<Product>, PlatformApiError> {
        let request = self
            .request(Method::GET, &["product", "v1", "products"])?
            .query(&[("query", query)]);
        self.send_json(request).await
    }

    async fn query_funds(&self, query: &str) -> Result<Vec<Fund>, PlatformApiError> {
        let request = self
            .request(Method::GET, &["product", "v1", "funds"])?
            .query(&[("query", query)]);
        self.send_json(request).await
    }

    async fn portfolio_performance_types(
        &self,
        customer_id: &str,
    ) -> Result<HashMap<String, PerformanceTypeInfo>, PlatformApiError> {
        let path = customer_path(customer_id, &["portfolio", "overview-types"]);
        self.send_json(self.request(Method::GET, &path)?).await
    }

    async fn latest_portfolio_summary(&self, customer_id: &str) -> Result<PortfolioSummary, PlatformApiError> {
        let path = customer_path(customer_id, &["portfolio", "latest"]);
        self.send_json(self.request(Method::GET, &path)?).await
    }

    async fn portfolio_performance(
        &self,
        customer_id: &str,
        performance_type: PerformanceType,
    ) -> Result<Vec<PerformancePoint>, PlatformApiError> {
        let path = customer_path(customer_id, &["portfolio", "overview"]);
        let request = self
            .request(Method::GET, &path)?
            .query(&[("type", performance_type.as_str())]);
        self.send_json(request).await
    }

    async fn portfolio_holdings(&self, customer_id: &str) -> Result<Vec<PortfolioHolding>, PlatformApiError> {
        let path = customer_path(customer_id, &["portfolio", "details"]);
        self.send_json(self.request(Method::GET, &path)?).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, PlatformApiError> {
        let request = self
            .request(Method::GET, &["product", "v1", "orders"])?
            .query(&[("sortOrders", "-createdDate")]);
        self.send_json(request).await
    }

    async fn find_orders(
        &self,
        page_number: u32,
        page_size: u32,
        query: Option<&str>,
    ) -> Result<OrderPage, PlatformApiError> {
        let mut request = self
            .request(Method::GET, &["product", "v1", "orders", "pagination"])?
            .query(&[("sortOrders", "-createdDate")])
            .query(&[("pageNumber", page_number), ("pageSize", page_size)]);
        if let Some(query) = query {
            request = request.query(&[("query", query)]);
        }
        self.send_json(request).await
    }

    async fn save_order(&self, order: &NewOrder) -> Result<Order, PlatformApiError> {
        let request = self.request(Method::POST, &["product", "v1", "orders"])?.json(order);
        self.send_json(request).await
    }
}
