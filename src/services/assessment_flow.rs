use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AnswerSet, AssessmentQuestion, FormTemplate, RiskProfileRecord, RiskProfileView, SubmitRiskProfile,
};
use crate::services::risk_score;

/// Who the assessment is for. Injected by the caller; the flow never reaches
/// for shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentContext {
    pub customer_id: String,
    /// Set when the assessment was started from a subscription.
    pub product_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Submission {
    /// Score computed, nothing sent yet.
    Ready,
    Submitting,
    Submitted(Box<RiskProfileRecord>),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum FlowState {
    Answering(usize),
    Complete(Submission),
    Exited,
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Answering(_) => "answering",
            FlowState::Complete(Submission::Ready) => "ready",
            FlowState::Complete(Submission::Submitting) => "submitting",
            FlowState::Complete(Submission::Submitted(_)) => "submitted",
            FlowState::Complete(Submission::Failed(_)) => "submission_failed",
            FlowState::Exited => "exited",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FlowError {
    #[error("assessment template has no questions")]
    EmptyTemplate,
    #[error("'{value}' is not an option of question {question_id}")]
    UnknownOption { question_id: String, value: String },
    #[error("question {0} has not been answered")]
    Unanswered(usize),
    #[error("cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: &'static str },
    #[error("risk profile submission already in progress")]
    SubmissionInProgress,
    #[error("risk profile already submitted")]
    AlreadySubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Question(usize),
    Completed { score: f64 },
    Exited,
}

/// Step-by-step risk assessment for one customer.
///
/// The score is computed once, on entering `Complete`. Submission moves
/// through `Ready -> Submitting -> Submitted | Failed`; only an explicit
/// [`AssessmentFlow::retry_submission`] leaves `Failed`.
#[derive(Debug, Clone)]
pub struct AssessmentFlow {
    context: AssessmentContext,
    template: FormTemplate,
    questions: Vec<AssessmentQuestion>,
    answers: AnswerSet,
    state: FlowState,
    score: Option<f64>,
    completed_at: Option<DateTime<Utc>>,
}

impl AssessmentFlow {
    pub fn new(context: AssessmentContext, template: FormTemplate) -> Result<Self, FlowError> {
        let questions = template.assessment_questions();
        if questions.is_empty() {
            return Err(FlowError::EmptyTemplate);
        }

        Ok(Self {
            context,
            template,
            questions,
            answers: AnswerSet::new(),
            state: FlowState::Answering(0),
            score: None,
            completed_at: None,
        })
    }

    pub fn context(&self) -> &AssessmentContext {
        &self.context
    }

    pub fn template(&self) -> &FormTemplate {
        &self.template
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn total_steps(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based step; equals `total_steps` once complete.
    pub fn step(&self) -> usize {
        match self.state {
            FlowState::Answering(i) => i,
            _ => self.questions.len(),
        }
    }

    pub fn current_question(&self) -> Option<&AssessmentQuestion> {
        match self.state {
            FlowState::Answering(i) => self.questions.get(i),
            _ => None,
        }
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.current_question()
            .and_then(|q| self.answers.get(&q.id))
            .map(String::as_str)
    }

    pub fn answer(&mut self, value: &str) -> Result<(), FlowError> {
        let question = match self.state {
            FlowState::Answering(i) => &self.questions[i],
            ref other => {
                return Err(FlowError::InvalidTransition { action: "answer", state: other.name() })
            }
        };

        if !question.options.is_empty() && question.find_option(value).is_none() {
            return Err(FlowError::UnknownOption {
                question_id: question.id.clone(),
                value: value.to_string(),
            });
        }

        self.answers.insert(question.id.clone(), value.to_string());
        Ok(())
    }

    pub fn next(&mut self) -> Result<Transition, FlowError> {
        let index = match self.state {
            FlowState::Answering(i) => i,
            ref other => return Err(FlowError::InvalidTransition { action: "advance", state: other.name() }),
        };
        if !self.answers.contains_key(&self.questions[index].id) {
            return Err(FlowError::Unanswered(index));
        }

        if index + 1 < self.questions.len() {
            self.state = FlowState::Answering(index + 1);
            return Ok(Transition::Question(index + 1));
        }

        let score = risk_score::compute_score(&self.questions, &self.answers);
        self.score = Some(score);
        self.completed_at = Some(Utc::now());
        self.state = FlowState::Complete(Submission::Ready);
        Ok(Transition::Completed { score })
    }

    /// Leaving from the first question exits the flow and drops every answer.
    pub fn back(&mut self) -> Result<Transition, FlowError> {
        match self.state {
            FlowState::Answering(0) => {
                self.answers.clear();
                self.state = FlowState::Exited;
                Ok(Transition::Exited)
            }
            FlowState::Answering(i) => {
                self.state = FlowState::Answering(i - 1);
                Ok(Transition::Question(i - 1))
            }
            ref other => Err(FlowError::InvalidTransition { action: "go back", state: other.name() }),
        }
    }

    pub fn begin_submission(&mut self) -> Result<SubmitRiskProfile, FlowError> {
        match &self.state {
            FlowState::Complete(Submission::Ready) => self.start_submitting(),
            FlowState::Complete(Submission::Submitting) => Err(FlowError::SubmissionInProgress),
            FlowState::Complete(Submission::Submitted(_)) => Err(FlowError::AlreadySubmitted),
            other => Err(FlowError::InvalidTransition { action: "submit", state: other.name() }),
        }
    }

    /// Re-sends the same answers and score after a failed submission.
    pub fn retry_submission(&mut self) -> Result<SubmitRiskProfile, FlowError> {
        match &self.state {
            FlowState::Complete(Submission::Failed(_)) => self.start_submitting(),
            FlowState::Complete(Submission::Submitting) => Err(FlowError::SubmissionInProgress),
            FlowState::Complete(Submission::Submitted(_)) => Err(FlowError::AlreadySubmitted),
            other => Err(FlowError::InvalidTransition { action: "retry", state: other.name() }),
        }
    }

    fn start_submitting(&mut self) -> Result<SubmitRiskProfile, FlowError> {
        let payload = SubmitRiskProfile {
            risk_answer: self.answers.clone(),
            risk_assessment_date: self.completed_at.unwrap_or_else(Utc::now),
            risk_score: self.score.unwrap_or_default(),
            template_id: self.template.id.clone(),
        };
        self.state = FlowState::Complete(Submission::Submitting);
        Ok(payload)
    }

    pub fn finish_submission(&mut self, outcome: Result<RiskProfileRecord, String>) -> Result<(), FlowError> {
        if !matches!(self.state, FlowState::Complete(Submission::Submitting)) {
            return Err(FlowError::InvalidTransition {
                action: "record a submission",
                state: self.state.name(),
            });
        }

        self.state = FlowState::Complete(match outcome {
            Ok(record) => Submission::Submitted(Box::new(record.with_template_fallback(&self.template))),
            Err(message) => Submission::Failed(message),
        });
        Ok(())
    }

    pub fn submitted_record(&self) -> Option<&RiskProfileRecord> {
        match &self.state {
            FlowState::Complete(Submission::Submitted(record)) => Some(record.as_ref()),
            _ => None,
        }
    }

    pub fn submission_error(&self) -> Option<&str> {
        match &self.state {
            FlowState::Complete(Submission::Failed(message)) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn snapshot(&self, session_id: Uuid) -> AssessmentSnapshot {
        AssessmentSnapshot {
            session_id,
            customer_id: self.context.customer_id.clone(),
            product_id: self.context.product_id.clone(),
            template_id: self.template.id.clone(),
            status: self.state.name(),
            step: self.step(),
            total_steps: self.total_steps(),
            question: self.current_question().cloned(),
            answer: self.current_answer().map(str::to_string),
            can_advance: self.current_answer().is_some(),
            score: self.score,
            error: self.submission_error().map(str::to_string),
            risk_profile: self.submitted_record().map(RiskProfileView::from_record),
        }
    }
}

/// What clients see of an in-progress assessment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSnapshot {
    pub session_id: Uuid,
    pub customer_id: String,
    pub product_id: Option<String>,
    pub template_id: String,
    pub status: &'static str,
    pub step: usize,
    pub total_steps: usize,
    pub question: Option<AssessmentQuestion>,
    pub answer: Option<String>,
    pub can_advance: bool,
    pub score: Option<f64>,
    pub error: Option<String>,
    pub risk_profile: Option<RiskProfileView>,
}
