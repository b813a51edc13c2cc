pub mod assessment_flow;
pub mod assessment_service;
pub mod assessment_sessions;
pub mod chart_sampler;
pub mod fund_service;
pub mod order_service;
pub mod portfolio_service;
pub mod product_service;
pub mod risk_profile_service;
pub mod risk_score;
pub mod rsql;
