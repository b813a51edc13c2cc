use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::platform_api::PlatformApi;
use crate::models::SubmitRiskProfile;
use crate::services::assessment_flow::{
    AssessmentContext, AssessmentFlow, AssessmentSnapshot, FlowError, Transition,
};
use crate::services::assessment_sessions::AssessmentSessions;

fn in_session<T, F>(sessions: &AssessmentSessions, id: Uuid, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut AssessmentFlow) -> Result<T, FlowError>,
{
    sessions
        .with_session(id, f)
        .ok_or(AppError::NotFound)?
        .map_err(AppError::from)
}

fn snapshot(sessions: &AssessmentSessions, id: Uuid) -> Result<AssessmentSnapshot, AppError> {
    sessions.snapshot(id).ok_or(AppError::NotFound)
}

/// Loads the latest published template and opens a session for `context`.
pub async fn start(
    api: &dyn PlatformApi,
    sessions: &AssessmentSessions,
    context: AssessmentContext,
    template_key: &str,
) -> Result<AssessmentSnapshot, AppError> {
    let template = api.latest_published_template(template_key).await.map_err(|e| {
        error!("Failed to load assessment template {}: {}", template_key, e);
        AppError::from(e)
    })?;

    let customer_id = context.customer_id.clone();
    let flow = AssessmentFlow::new(context, template)?;
    let id = sessions.insert(flow);
    info!("Started assessment session {} for customer {}", id, customer_id);

    snapshot(sessions, id)
}

pub fn current(sessions: &AssessmentSessions, id: Uuid) -> Result<AssessmentSnapshot, AppError> {
    snapshot(sessions, id)
}

pub fn answer(sessions: &AssessmentSessions, id: Uuid, value: &str) -> Result<AssessmentSnapshot, AppError> {
    in_session(sessions, id, |flow| flow.answer(value))?;
    snapshot(sessions, id)
}

/// Moves to the next question. Completing the last question submits the
/// score straight away; a failed submission is reported on the snapshot.
pub async fn advance(
    api: &Arc<dyn PlatformApi>,
    sessions: &AssessmentSessions,
    id: Uuid,
) -> Result<AssessmentSnapshot, AppError> {
    let transition = in_session(sessions, id, AssessmentFlow::next)?;

    if let Transition::Completed { score } = transition {
        info!("Assessment session {} complete with score {}", id, score);
        submit(api, sessions, id, AssessmentFlow::begin_submission).await?;
    }

    snapshot(sessions, id)
}

/// Steps back. Backing out of the first question discards the session.
pub fn back(sessions: &AssessmentSessions, id: Uuid) -> Result<AssessmentSnapshot, AppError> {
    let transition = in_session(sessions, id, AssessmentFlow::back)?;
    let current = snapshot(sessions, id)?;

    if transition == Transition::Exited {
        sessions.remove(id);
        info!("Assessment session {} exited before completion", id);
    }
    Ok(current)
}

/// User-triggered resubmission after a failure. Never called automatically.
pub async fn retry(
    api: &Arc<dyn PlatformApi>,
    sessions: &AssessmentSessions,
    id: Uuid,
) -> Result<AssessmentSnapshot, AppError> {
    info!("Retrying risk profile submission for session {}", id);
    submit(api, sessions, id, AssessmentFlow::retry_submission).await?;
    snapshot(sessions, id)
}

pub fn abandon(sessions: &AssessmentSessions, id: Uuid) -> Result<(), AppError> {
    sessions.remove(id).ok_or(AppError::NotFound)?;
    info!("Assessment session {} abandoned", id);
    Ok(())
}

async fn submit<F>(
    api: &Arc<dyn PlatformApi>,
    sessions: &AssessmentSessions,
    id: Uuid,
    begin: F,
) -> Result<(), AppError>
where
    F: FnOnce(&mut AssessmentFlow) -> Result<SubmitRiskProfile, FlowError>,
{
    // The guard transition happens under the session lock; the request
    // itself is made without holding it.
    let (customer_id, payload) = in_session(sessions, id, |flow| {
        let payload = begin(flow)?;
        Ok((flow.context().customer_id.clone(), payload))
    })?;

    // Detached from the caller: the outcome is recorded even if the request is dropped.
    let api = Arc::clone(api);
    let task_sessions = sessions.clone();
    let task = tokio::spawn(async move {
        let outcome = api
            .save_risk_profile(&customer_id, &payload)
            .await
            .map_err(|e| {
                error!("Failed to save risk profile for customer {}: {}", customer_id, e);
                e.to_string()
            });

        if outcome.is_ok() {
            info!("Risk profile saved for customer {} (score {})", customer_id, payload.risk_score);
        }

        let recorded = task_sessions.with_session(id, |flow| flow.finish_submission(outcome));
        if recorded.is_none() {
            warn!("Assessment session {} vanished while its submission was in flight", id);
        }
        recorded
    });

    match task.await {
        Ok(Some(result)) => result.map_err(AppError::from),
        Ok(None) => Err(AppError::NotFound),
        Err(e) => {
            error!("Submission task for session {} did not complete: {}", id, e);
            let message = "submission did not complete".to_string();
            let _ = sessions.with_session(id, |flow| flow.finish_submission(Err(message)));
            Err(AppError::External(e.to_string()))
        }
    }
}
