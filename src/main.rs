use std::sync::Arc;

use tokio::net::TcpListener;

use fundportal_backend::app;
use fundportal_backend::config::AppConfig;
use fundportal_backend::external::rest_platform::RestPlatformApi;
use fundportal_backend::logging::{init_logging, LoggingConfig};
use fundportal_backend::services::assessment_sessions::{spawn_session_reaper, AssessmentSessions};
use fundportal_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;
    let api = RestPlatformApi::from_config(&config)?;
    tracing::info!("Using platform API at {}", config.api_base_url);

    let sessions = AssessmentSessions::new();
    spawn_session_reaper(sessions.clone(), config.session_ttl);

    let addr = config.bind_addr;
    let state = AppState {
        api: Arc::new(api),
        sessions,
        config: Arc::new(config),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Fund portal backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
