#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use fundportal_backend::config::AppConfig;
use fundportal_backend::external::platform_api::{PlatformApi, PlatformApiError};
use fundportal_backend::models::{
    FormTemplate, Fund, NewOrder, Order, OrderPage, PerformancePoint, PerformanceType, PerformanceTypeInfo,
    PortfolioHolding, PortfolioSummary, Product, RiskProfileRecord, SubmitRiskProfile,
};
use fundportal_backend::services::assessment_sessions::AssessmentSessions;
use fundportal_backend::state::AppState;

/// In-memory stand-in for the platform REST API.
pub struct FakePlatformApi {
    pub template: FormTemplate,
    pub fail_saves: AtomicBool,
    pub save_attempts: AtomicUsize,
    pub save_delay: Option<Duration>,
    pub saved: Mutex<Vec<(String, SubmitRiskProfile)>>,
    pub records: Mutex<Vec<RiskProfileRecord>>,
    pub performance: Vec<PerformancePoint>,
    pub products: Mutex<Vec<Product>>,
    pub product_queries: Mutex<Vec<String>>,
    pub funds: Vec<Fund>,
    pub fund_queries: Mutex<Vec<String>>,
    pub portfolio_summary: Option<PortfolioSummary>,
    pub holdings: Vec<PortfolioHolding>,
    pub orders: Mutex<Vec<Order>>,
    /// `(page_number, page_size, query)` of every order search.
    pub order_searches: Mutex<Vec<(u32, u32, Option<String>)>>,
}

impl FakePlatformApi {
    pub fn new() -> Self {
        Self {
            template: assessment_template(),
            fail_saves: AtomicBool::new(false),
            save_attempts: AtomicUsize::new(0),
            save_delay: None,
            saved: Mutex::new(Vec::new()),
            records: Mutex::new(Vec::new()),
            performance: Vec::new(),
            products: Mutex::new(Vec::new()),
            product_queries: Mutex::new(Vec::new()),
            funds: Vec::new(),
            fund_queries: Mutex::new(Vec::new()),
            portfolio_summary: None,
            holdings: Vec::new(),
            orders: Mutex::new(Vec::new()),
            order_searches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_funds(mut self, funds: Vec<Fund>) -> Self {
        self.funds = funds;
        self
    }

    pub fn with_portfolio(mut self, summary: PortfolioSummary, holdings: Vec<PortfolioHolding>) -> Self {
        self.portfolio_summary = Some(summary);
        self.holdings = holdings;
        self
    }

    pub fn failing_saves(self, fail: bool) -> Self {
        self.fail_saves.store(fail, Ordering::SeqCst);
        self
    }

    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    pub fn with_performance(mut self, series: Vec<PerformancePoint>) -> Self {
        self.performance = series;
        self
    }

    pub fn saved_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }

    pub fn attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformApi for FakePlatformApi {
    async fn latest_published_template(&self, key: &str) -> Result<FormTemplate, PlatformApiError> {
        if key == self.template.key {
            Ok(self.template.clone())
        } else {
            Err(PlatformApiError::NotFound)
        }
    }

    async fn form_template(&self, id: &str) -> Result<FormTemplate, PlatformApiError> {
        if id == self.template.id {
            Ok(self.template.clone())
        } else {
            Err(PlatformApiError::NotFound)
        }
    }

    async fn save_risk_profile(
        &self,
        customer_id: &str,
        payload: &SubmitRiskProfile,
    ) -> Result<RiskProfileRecord, PlatformApiError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PlatformApiError::BadResponse("API returned status: 503".to_string()));
        }

        let mut saved = self.saved.lock().unwrap();
        saved.push((customer_id.to_string(), payload.clone()));

        // The persistence layer does not echo the template back.
        let record = RiskProfileRecord {
            id: Some(format!("rp-{}", saved.len())),
            risk_score: Some(payload.risk_score),
            template_id: Some(payload.template_id.clone()),
            risk_answer: payload.risk_answer.clone(),
            risk_assessment_date: Some(payload.risk_assessment_date.to_rfc3339()),
            form_template: None,
        };
        self.records.lock().unwrap().insert(0, record.clone());
        Ok(record)
    }

    async fn list_risk_profiles(&self, _customer_id: &str) -> Result<Vec<RiskProfileRecord>, PlatformApiError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn delete_risk_profile(&self, _customer_id: &str, risk_profile_id: &str) -> Result<(), PlatformApiError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id.as_deref() != Some(risk_profile_id));
        if records.len() == before {
            Err(PlatformApiError::NotFound)
        } else {
            Ok(())
        }
    }

    async fn performance_types(&self, _fund_id: &str) -> Result<HashMap<String, PerformanceTypeInfo>, PlatformApiError> {
        Ok(HashMap::from([
            ("ONE_MONTH".to_string(), PerformanceTypeInfo { data_size: Some(21) }),
            ("THREE_YEARS".to_string(), PerformanceTypeInfo { data_size: Some(1) }),
            ("ONE_YEAR".to_string(), PerformanceTypeInfo { data_size: Some(250) }),
        ]))
    }

    async fn performance(
        &self,
        _fund_id: &str,
        _performance_type: PerformanceType,
    ) -> Result<Vec<PerformancePoint>, PlatformApiError> {
        Ok(self.performance.clone())
    }

    async fn query_products(&self, query: &str) -> Result<Vec<Product>, PlatformApiError> {
        self.product_queries.lock().unwrap().push(query.to_string());
        Ok(self.products.lock().unwrap().clone())
    }

    async fn query_funds(&self, query: &str) -> Result<Vec<Fund>, PlatformApiError> {
        self.fund_queries.lock().unwrap().push(query.to_string());
        let id = query.trim_start_matches("id==");
        Ok(self.funds.iter().filter(|f| f.id == id).cloned().collect())
    }

    async fn portfolio_performance_types(
        &self,
        _customer_id: &str,
    ) -> Result<HashMap<String, PerformanceTypeInfo>, PlatformApiError> {
        Ok(HashMap::from([
            ("SIX_MONTHS".to_string(), PerformanceTypeInfo { data_size: Some(120) }),
            ("ONE_YEAR".to_string(), PerformanceTypeInfo { data_size: Some(2) }),
        ]))
    }

    async fn latest_portfolio_summary(&self, _customer_id: &str) -> Result<PortfolioSummary, PlatformApiError> {
        self.portfolio_summary.clone().ok_or(PlatformApiError::NotFound)
    }

    async fn portfolio_performance(
        &self,
        _customer_id: &str,
        _performance_type: PerformanceType,
    ) -> Result<Vec<PerformancePoint>, PlatformApiError> {
        Ok(self.performance.clone())
    }

    async fn portfolio_holdings(&self, _customer_id: &str) -> Result<Vec<PortfolioHolding>, PlatformApiError> {
        Ok(self.holdings.clone())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, PlatformApiError> {
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn find_orders(
        &self,
        page_number: u32,
        page_size: u32,
        query: Option<&str>,
    ) -> Result<OrderPage, PlatformApiError> {
        self.order_searches
            .lock()
            .unwrap()
            .push((page_number, page_size, query.map(str::to_string)));
        let orders = self.orders.lock().unwrap().clone();
        let total = orders.len() as u64;
        Ok(OrderPage {
            content: orders,
            total_pages: if total == 0 { 0 } else { 1 },
            total_elements: total,
        })
    }

    async fn save_order(&self, order: &NewOrder) -> Result<Order, PlatformApiError> {
        let mut orders = self.orders.lock().unwrap();
        let saved: Order = serde_json::from_value(json!({
            "id": format!("ord-{}", orders.len() + 1),
            "type": order.order_type,
            "status": "PROCESSING",
            "product": { "id": order.product_id, "name": "" },
            "amount": order.amount,
            "unit": order.unit,
            "currency": order.currency,
            "ownerId": order.owner_id
        }))
        .map_err(|e| PlatformApiError::Parse(e.to_string()))?;
        orders.insert(0, saved.clone());
        Ok(saved)
    }
}

/// Two scored questions plus one unscored, and two bands:
/// low `[0, 5]`, high `[6, 20]`.
pub fn assessment_template() -> FormTemplate {
    serde_json::from_value(json!({
        "id": "tpl-risk-1",
        "key": "ASSESSMENT_FORM_TEST_3",
        "status": "PUBLISHED",
        "form": {
            "questions": [
                {
                    "id": "q1",
                    "question": "How would you react to a 20% fall?",
                    "options": [
                        { "value": "a", "label": "Sell everything", "points": 1 },
                        { "value": "b", "label": "Buy more", "points": 5 }
                    ]
                },
                {
                    "id": "q2",
                    "question": "Investment horizon?",
                    "options": [{ "id": "a", "text": "Over 5 years", "score": 2 }]
                },
                {
                    "id": "q3",
                    "question": "Is this your first investment?",
                    "answerConfig": {
                        "options": [
                            { "config": { "value": "yes", "label": "Yes" } },
                            { "config": { "value": "no", "label": "No" } }
                        ]
                    }
                }
            ],
            "riskProfiles": [
                {
                    "id": "low",
                    "name": "Conservative",
                    "description": "Protect capital.",
                    "riskRating": ["1", "2"],
                    "scoreAssignment": { "min": 0, "max": 5 }
                },
                {
                    "id": "high",
                    "name": "Growth",
                    "description": [{ "text": "Seek" }, { "text": "growth." }],
                    "riskRating": ["4", "5"],
                    "scoreAssignment": { "min": 6, "max": 20 }
                }
            ]
        }
    }))
    .expect("fixture template is valid")
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|_| None).expect("default config is valid")
}

pub fn app_state(api: Arc<FakePlatformApi>) -> AppState {
    AppState {
        api,
        sessions: AssessmentSessions::new(),
        config: Arc::new(test_config()),
    }
}
