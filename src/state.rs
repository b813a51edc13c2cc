use std::sync::Arc;

use crate::config::AppConfig;
use crate::external::platform_api::PlatformApi;
use crate::services::assessment_sessions::AssessmentSessions;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn PlatformApi>,
    pub sessions: AssessmentSessions,
    pub config: Arc<AppConfig>,
}
