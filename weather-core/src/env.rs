use std::collections::HashMap;
use thiserror::Error;

use crate::config::OpenWeatherSettings;

/// Alternate credential name accepted when the configured one is unset.
pub const FALLBACK_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("❌ Missing required environment variable: {0}")]
    MissingVar(String),
}

/// Read access to environment-style configuration values.
///
/// The pipeline only ever reads through this trait, so tests can hand it a map
/// instead of mutating the real process environment.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Returns the first non-blank value of `name`, then of each fallback, trimmed.
///
/// The error always names `name`, the primary variable.
pub fn require_var(
    env: &dyn EnvSource,
    name: &str,
    fallbacks: &[&str],
) -> Result<String, ConfigError> {
    std::iter::once(name)
        .chain(fallbacks.iter().copied())
        .filter_map(|n| env.var(n))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

/// Checks that the weather API credential is present before any network access.
pub fn validate_environment(
    env: &dyn EnvSource,
    settings: &OpenWeatherSettings,
) -> Result<String, ConfigError> {
    match require_var(env, &settings.api_key_env, &[FALLBACK_API_KEY_ENV]) {
        Ok(key) => {
            tracing::info!("✅ Environment variables validated");
            Ok(key)
        }
        Err(e) => {
            tracing::error!("{e}");
            Err(e)
        }
    }
}
