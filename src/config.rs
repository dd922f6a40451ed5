use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.pulse.neat.no/v1";
pub const DEFAULT_OUTPUT_CSV: &str = "neat_device_enrollment_codes.csv";
pub const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub org_id: String,
    pub base_url: String,
    pub rate_limit_delay: Duration,
    pub output_csv: PathBuf,
}

impl Config {
    /// Config with the given credentials and every optional setting at its default.
    pub fn new(api_key: impl Into<String>, org_id: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            org_id: org_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit_delay: Duration::from_millis(DEFAULT_RATE_LIMIT_DELAY_MS),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let org_id = get("ORG_ID").ok_or(ConfigError::MissingOrgId)?;

        let base_url = match get("PULSE_BASE_URL") {
            Some(raw) => validate_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        let rate_limit_delay = match get("RATE_LIMIT_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidRateLimitDelay(raw))?,
            None => Duration::from_millis(DEFAULT_RATE_LIMIT_DELAY_MS),
        };

        Ok(Config {
            api_key: api_key.trim().to_string(),
            org_id: org_id.trim().to_string(),
            base_url,
            rate_limit_delay,
            output_csv: get("OUTPUT_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_CSV)),
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }

    Ok(trimmed.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API_KEY must be set in the environment or .env file")]
    MissingApiKey,
    #[error("ORG_ID must be set in the environment or .env file")]
    MissingOrgId,
    #[error("Invalid PULSE_BASE_URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid RATE_LIMIT_DELAY_MS: {0}")]
    InvalidRateLimitDelay(String),
}
