use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_ASSESSMENT_TEMPLATE_KEY: &str = "ASSESSMENT_FORM_TEST_3";
pub const DEFAULT_CHART_MAX_POINTS: usize = 50;
pub const DEFAULT_CHART_MAX_LABELS: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Bounds applied when turning a performance series into a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLimits {
    pub max_points: usize,
    pub max_labels: usize,
}

impl Default for ChartLimits {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_CHART_MAX_POINTS,
            max_labels: DEFAULT_CHART_MAX_LABELS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub api_timeout: Duration,
    pub assessment_template_key: String,
    pub chart_limits: ChartLimits,
    pub session_ttl: chrono::Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("PLATFORM_API_URL")
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        let api_base_url = Url::parse(&api_url).map_err(|source| ConfigError::InvalidUrl {
            name: "PLATFORM_API_URL",
            source,
        })?;

        let bind_addr = parse_or("BIND_ADDR", &lookup, SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let timeout_secs: u64 = parse_or("PLATFORM_API_TIMEOUT_SECS", &lookup, 15)?;
        let max_points: usize = parse_or("CHART_MAX_POINTS", &lookup, DEFAULT_CHART_MAX_POINTS)?;
        let max_labels: usize = parse_or("CHART_MAX_LABELS", &lookup, DEFAULT_CHART_MAX_LABELS)?;
        let ttl_minutes: i64 = parse_or("ASSESSMENT_SESSION_TTL_MINUTES", &lookup, 30)?;

        if ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "ASSESSMENT_SESSION_TTL_MINUTES",
                value: ttl_minutes.to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            api_base_url,
            api_token: lookup("PLATFORM_API_TOKEN").filter(|t| !t.is_empty()),
            api_timeout: Duration::from_secs(timeout_secs),
            assessment_template_key: lookup("ASSESSMENT_TEMPLATE_KEY")
                .unwrap_or_else(|| DEFAULT_ASSESSMENT_TEMPLATE_KEY.to_string()),
            chart_limits: ChartLimits { max_points, max_labels },
            session_ttl: chrono::Duration::minutes(ttl_minutes),
        })
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
