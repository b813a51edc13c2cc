use tracing::{error, info};

use crate::errors::AppError;
use crate::external::platform_api::PlatformApi;
use crate::models::{AnswerSet, RiskProfileRecord, RiskProfileView, SubmitRiskProfile};

/// The customer's most recent risk profile with its band resolved.
pub async fn latest(api: &dyn PlatformApi, customer_id: &str) -> Result<Option<RiskProfileView>, AppError> {
    let records = list(api, customer_id).await?;
    Ok(records.first().map(RiskProfileView::from_record))
}

pub async fn list(api: &dyn PlatformApi, customer_id: &str) -> Result<Vec<RiskProfileRecord>, AppError> {
    api.list_risk_profiles(customer_id).await.map_err(|e| {
        error!("Failed to load risk profiles for customer {}: {}", customer_id, e);
        AppError::from(e)
    })
}

pub async fn remove(api: &dyn PlatformApi, customer_id: &str, risk_profile_id: &str) -> Result<(), AppError> {
    api.delete_risk_profile(customer_id, risk_profile_id).await.map_err(|e| {
        error!("Failed to remove risk profile {} for customer {}: {}", risk_profile_id, customer_id, e);
        AppError::from(e)
    })?;
    info!("Removed risk profile {} for customer {}", risk_profile_id, customer_id);
    Ok(())
}

/// Records a manually chosen band instead of an assessed one.
///
/// No answers are stored; the score is pinned to the band's lower bound so
/// the saved profile resolves back to the chosen band.
pub async fn set_preference(
    api: &dyn PlatformApi,
    customer_id: &str,
    template_id: &str,
    band_id: &str,
) -> Result<RiskProfileView, AppError> {
    let template = api.form_template(template_id).await.map_err(|e| {
        error!("Failed to load form template {}: {}", template_id, e);
        AppError::from(e)
    })?;

    let band = template
        .band(band_id)
        .ok_or_else(|| AppError::Validation(format!("Unknown risk profile {} in template {}", band_id, template_id)))?;

    let payload = SubmitRiskProfile {
        risk_answer: AnswerSet::new(),
        risk_assessment_date: chrono::Utc::now(),
        risk_score: band.score_assignment.map(|range| range.min).unwrap_or(0.0),
        template_id: template.id.clone(),
    };

    let saved = api.save_risk_profile(customer_id, &payload).await.map_err(|e| {
        error!("Failed to save risk preference for customer {}: {}", customer_id, e);
        AppError::from(e)
    })?;
    info!("Customer {} selected risk profile {}", customer_id, band_id);

    Ok(RiskProfileView::from_record(&saved.with_template_fallback(&template)))
}
