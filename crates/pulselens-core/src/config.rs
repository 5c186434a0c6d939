//! Application configuration loaded from environment variables.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Runtime configuration for PulseLens.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted table project (row source + identity provider).
    pub project_url: String,
    /// Anonymous API key sent with every request.
    pub api_key: String,
    /// Source tables to fetch, in display order.
    pub tables: Vec<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Milliseconds a session may stay hidden before it is invalidated.
    pub idle_timeout_ms: u64,
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var`
/// needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let project_url = require("PULSELENS_PROJECT_URL")?;
    let api_key = require("PULSELENS_API_KEY")?;

    let tables: Vec<String> = or_default("PULSELENS_TABLES", "FM,PTI")
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tables.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "PULSELENS_TABLES".to_string(),
            reason: "no table names given".to_string(),
        });
    }

    let log_level = or_default("PULSELENS_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PULSELENS_REQUEST_TIMEOUT_SECS", "30")?;
    let idle_timeout_ms = parse_u64("PULSELENS_IDLE_TIMEOUT_MS", "300000")?;

    Ok(AppConfig {
        project_url,
        api_key,
        tables,
        log_level,
        request_timeout_secs,
        idle_timeout_ms,
    })
}
