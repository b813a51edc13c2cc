use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::form_template::{render_rich_text, FormTemplate, RiskProfileBand};
use crate::services::risk_score;

/// Question id to selected option value.
pub type AnswerSet = BTreeMap<String, String>;

/// A risk profile as persisted by the platform API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub risk_answer: AnswerSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_template: Option<FormTemplate>,
}

impl RiskProfileRecord {
    /// The persistence layer does not always echo the template back; band
    /// lookup needs it, so the submitted template fills the gap.
    pub fn with_template_fallback(mut self, template: &FormTemplate) -> Self {
        let has_bands = self
            .form_template
            .as_ref()
            .map(|t| !t.form.risk_profiles.is_empty())
            .unwrap_or(false);
        if !has_bands {
            self.form_template = Some(template.clone());
        }
        if self.template_id.is_none() {
            self.template_id = Some(template.id.clone());
        }
        self
    }

    pub fn bands(&self) -> &[RiskProfileBand] {
        self.form_template
            .as_ref()
            .map(|t| t.form.risk_profiles.as_slice())
            .unwrap_or_default()
    }
}

/// Body sent to `POST /customer/v1/customers/{id}/risk-profiles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRiskProfile {
    pub risk_answer: AnswerSet,
    pub risk_assessment_date: DateTime<Utc>,
    pub risk_score: f64,
    pub template_id: String,
}

/// Plain-text rendering of a band for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub investment_objective: String,
    pub risk_tolerance: String,
    pub risk_rating: Vec<String>,
}

impl From<&RiskProfileBand> for ProfileSummary {
    fn from(band: &RiskProfileBand) -> Self {
        let text = |value: &Option<serde_json::Value>| {
            value.as_ref().map(render_rich_text).unwrap_or_default()
        };
        Self {
            id: band.id.clone(),
            name: band.name.clone(),
            description: render_rich_text(&band.description),
            investment_objective: text(&band.investment_objective),
            risk_tolerance: text(&band.risk_tolerance),
            risk_rating: band.risk_rating.clone(),
        }
    }
}

/// A persisted risk profile with its band resolved.
///
/// `profile` is `None` when no band contains the score; clients must offer a
/// retake or contact path rather than assume a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfileView {
    pub profiles: Vec<RiskProfileBand>,
    pub profile: Option<ProfileSummary>,
    pub template_id: Option<String>,
    pub risk_score: Option<f64>,
    pub risk_answer: AnswerSet,
}

impl RiskProfileView {
    pub fn from_record(record: &RiskProfileRecord) -> Self {
        let profiles = record.bands().to_vec();
        let profile = record
            .risk_score
            .and_then(|score| risk_score::resolve_band(&profiles, score))
            .map(ProfileSummary::from);

        Self {
            profile,
            profiles,
            template_id: record.template_id.clone(),
            risk_score: record.risk_score,
            risk_answer: record.risk_answer.clone(),
        }
    }
}
