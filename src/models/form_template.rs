use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A published form template as served by the platform API.
///
/// Only the assessment-relevant parts of `form` are modelled; anything else
/// the template carries is ignored on ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub form: TemplateForm,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateForm {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub risk_profiles: Vec<RiskProfileBand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_config: Option<AnswerConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerConfig {
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

/// The two option shapes templates are authored with.
///
/// `Plain` must be tried first: every field of `Scored` is optional, so it
/// would otherwise swallow `{ "config": ... }` objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionOption {
    Plain(PlainOption),
    Scored(ScoredOption),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoredOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlainOption {
    pub config: PlainOptionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlainOptionConfig {
    pub value: String,
    pub label: String,
}

/// Normalized, scoring-ready option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
    pub points: f64,
}

/// A question after ingestion: one option shape regardless of how it was authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub options: Vec<ChoiceOption>,
}

impl AssessmentQuestion {
    pub fn new(id: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            id: id.into(),
            prompt: String::new(),
            category: None,
            options,
        }
    }

    pub fn find_option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|opt| opt.value == value)
    }
}

impl QuestionOption {
    pub fn to_choice(&self) -> ChoiceOption {
        match self {
            QuestionOption::Scored(opt) => ChoiceOption {
                value: first_non_empty(&opt.value, &opt.id),
                label: first_non_empty(&opt.label, &opt.text),
                // A zero `points` falls through to `score`.
                points: opt
                    .points
                    .filter(|p| *p != 0.0)
                    .or(opt.score)
                    .unwrap_or(0.0),
            },
            QuestionOption::Plain(opt) => ChoiceOption {
                value: opt.config.value.clone(),
                label: opt.config.label.clone(),
                points: 0.0,
            },
        }
    }
}

fn first_non_empty(primary: &Option<String>, fallback: &Option<String>) -> String {
    primary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}

impl Question {
    /// Direct `options` win over `answerConfig.options` when both are present.
    pub fn normalize(&self) -> AssessmentQuestion {
        let source: &[QuestionOption] = if !self.options.is_empty() {
            &self.options
        } else {
            self.answer_config
                .as_ref()
                .map(|config| config.options.as_slice())
                .unwrap_or_default()
        };

        AssessmentQuestion {
            id: self.id.clone(),
            prompt: self.question.clone(),
            category: self.category.clone(),
            options: source.iter().map(QuestionOption::to_choice).collect(),
        }
    }
}

impl FormTemplate {
    pub fn assessment_questions(&self) -> Vec<AssessmentQuestion> {
        self.form.questions.iter().map(Question::normalize).collect()
    }

    pub fn band(&self, band_id: &str) -> Option<&RiskProfileBand> {
        self.form.risk_profiles.iter().find(|band| band.id == band_id)
    }
}

/// Inclusive score range of a risk profile band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub equities: f64,
    pub bonds: f64,
}

/// A named risk profile, selected when a score falls in `score_assignment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfileBand {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub risk_rating: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_assignment: Option<ScoreRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_objective: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_tolerance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_allocation: Option<AssetAllocation>,
    #[serde(default)]
    pub suitability: Vec<f64>,
}

impl RiskProfileBand {
    pub fn new(id: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: Value::Null,
            risk_rating: Vec::new(),
            score_assignment: Some(ScoreRange { min, max }),
            investment_objective: None,
            risk_tolerance: None,
            asset_allocation: None,
            suitability: Vec::new(),
        }
    }
}

/// Flattens template rich text: plain strings pass through, block arrays
/// are joined by their `text` fields.
pub fn render_rich_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(blocks) => blocks
            .iter()
            .map(|block| block.get("text").and_then(Value::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}
