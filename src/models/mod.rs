pub mod form_template;
pub mod order;
pub mod performance;
pub mod portfolio;
pub mod product;
pub mod risk_profile;

pub use form_template::{
    render_rich_text, AssessmentQuestion, ChoiceOption, FormTemplate, Question, QuestionOption,
    RiskProfileBand, ScoreRange, TemplateForm,
};
pub use order::{NewOrder, Order, OrderPage, OrderProduct, OrderType};
pub use performance::{
    AxisLabel, AxisTick, ChartData, ChartValue, PerformancePoint, PerformanceType,
    PerformanceTypeInfo, PerformanceTypeOption,
};
pub use portfolio::{
    ClassDetail, CurrencyPosition, HoldingView, PortfolioHolding, PortfolioOverview, PortfolioSummary,
};
pub use product::{Fund, Product};
pub use risk_profile::{AnswerSet, ProfileSummary, RiskProfileRecord, RiskProfileView, SubmitRiskProfile};
