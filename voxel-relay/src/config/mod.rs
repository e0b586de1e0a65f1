use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Public Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Models tried in order when running in fallback mode.
pub const DEFAULT_MODEL_CANDIDATES: &[&str] = &[
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
    "gemini-1.5-flash-001",
    "gemini-1.5-pro",
    "gemini-pro",
];

pub const DEFAULT_SINGLE_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub relay: RelaySettings,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Missing keys are tolerated at startup; every generate call then fails.
    pub api_key: Option<String>,
    pub api_base: String,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    pub strategy: RelayStrategy,
    /// Reject arrays whose elements are not well-formed voxels.
    pub validate_voxels: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

/// Which models to try for a single generate call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum RelayStrategy {
    /// Try each model in order; the first usable answer wins.
    Fallback(Vec<String>),
    /// One model, no retries.
    Single(String),
}

impl RelayStrategy {
    pub fn models(&self) -> &[String] {
        match self {
            RelayStrategy::Fallback(models) => models,
            RelayStrategy::Single(model) => std::slice::from_ref(model),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RelayStrategy::Fallback(_))
    }
}

impl Default for RelayStrategy {
    fn default() -> Self {
        RelayStrategy::Fallback(
            DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|m| m.to_string())
                .collect(),
        )
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let strategy = parse_strategy(
            &get_env("RELAY_MODE", "fallback"),
            &get_env("RELAY_MODEL_CANDIDATES", &DEFAULT_MODEL_CANDIDATES.join(",")),
            &get_env("RELAY_SINGLE_MODEL", DEFAULT_SINGLE_MODEL),
        )?;

        let request_timeout_secs = get_optional_env("GEMINI_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_timeout_secs(&raw))
            .transpose()?;

        Ok(RelayConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: get_optional_env("GEMINI_API_KEY"),
                api_base: get_env("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
                request_timeout_secs,
            },
            relay: RelaySettings {
                strategy,
                validate_voxels: parse_flag(&get_env("RELAY_VALIDATE_VOXELS", "false")),
            },
            observability: ObservabilityConfig {
                log_level: get_env("LOG_LEVEL", "info"),
                otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            },
        })
    }
}

/// Build the strategy from `RELAY_MODE` and its model settings.
pub fn parse_strategy(
    mode: &str,
    candidates: &str,
    single_model: &str,
) -> Result<RelayStrategy, AppError> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "fallback" => {
            let models: Vec<String> = candidates
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
            if models.is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "RELAY_MODEL_CANDIDATES must name at least one model"
                )));
            }
            Ok(RelayStrategy::Fallback(models))
        }
        "single" => {
            let model = single_model.trim();
            if model.is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "RELAY_SINGLE_MODEL must not be empty"
                )));
            }
            Ok(RelayStrategy::Single(model.to_string()))
        }
        other => Err(AppError::ConfigError(anyhow::anyhow!(
            "RELAY_MODE must be 'fallback' or 'single', got '{}'",
            other
        ))),
    }
}

/// Outbound timeout in whole seconds; zero would fail every call.
pub fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "GEMINI_REQUEST_TIMEOUT_SECS must be a whole number of seconds: {}",
            e
        ))
    })?;
    if secs == 0 {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "GEMINI_REQUEST_TIMEOUT_SECS must be greater than zero; unset it for no timeout"
        )));
    }
    Ok(secs)
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
