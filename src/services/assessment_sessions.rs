use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::services::assessment_flow::{AssessmentFlow, AssessmentSnapshot, FlowState, Submission};

/// An assessment in progress, owned by exactly one customer attempt.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    pub flow: AssessmentFlow,
    pub last_touched: DateTime<Utc>,
}

/// Thread-safe registry of in-progress assessments.
///
/// Access goes through short synchronous closures so no map guard is ever
/// held across an `.await`.
#[derive(Clone, Default)]
pub struct AssessmentSessions {
    sessions: Arc<DashMap<Uuid, AssessmentSession>>,
}

impl AssessmentSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, flow: AssessmentFlow) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, AssessmentSession { flow, last_touched: Utc::now() });
        id
    }

    /// Runs `f` against the session's flow, or returns `None` if it is gone.
    pub fn with_session<T, F>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut AssessmentFlow) -> T,
    {
        let mut entry = self.sessions.get_mut(&id)?;
        entry.last_touched = Utc::now();
        Some(f(&mut entry.flow))
    }

    pub fn snapshot(&self, id: Uuid) -> Option<AssessmentSnapshot> {
        self.sessions.get(&id).map(|entry| entry.flow.snapshot(id))
    }

    pub fn remove(&self, id: Uuid) -> Option<AssessmentFlow> {
        self.sessions.remove(&id).map(|(_, session)| session.flow)
    }

    /// Drops sessions idle for longer than `ttl`. Sessions with a submission
    /// in flight are kept so its outcome can still be recorded.
    pub fn cleanup_expired(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            session.last_touched > cutoff
                || matches!(session.flow.state(), FlowState::Complete(Submission::Submitting))
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[cfg(test)]
    fn backdate(&self, id: Uuid, by: Duration) {
        if let Some(mut entry) = self.sessions.get_mut(&id) {
            entry.last_touched -= by;
        }
    }
}

/// Evicts idle sessions once a minute for the lifetime of the runtime.
pub fn spawn_session_reaper(sessions: AssessmentSessions, ttl: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(StdDuration::from_secs(60));
        loop {
            ticker.tick().await;
            let evicted = sessions.cleanup_expired(ttl);
            if evicted > 0 {
                info!("Evicted {} idle assessment session(s)", evicted);
            }
        }
    })
}
