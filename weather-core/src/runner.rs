//! The whole refresh: validate the environment, fetch, rewrite the README.

use chrono::{DateTime, Utc};
use std::path::Path;
use thiserror::Error;

use crate::{
    Config, ConfigError, FetchError,
    env::EnvSource,
    provider::{fetch_weather_data, provider_from_config},
    readme::{ReadmeUpdate, update_readme},
};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("❌ Environment validation failed, weather was not fetched")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("❌ {0:#}")]
    Setup(anyhow::Error),
}

impl From<anyhow::Error> for RunError {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<ConfigError>() {
            Ok(c) => RunError::Config(c),
            Err(e) => RunError::Setup(e),
        }
    }
}

/// Validate, build the configured provider and return the serialized snapshot.
pub async fn fetch(config: &Config, env: &dyn EnvSource) -> Result<String, RunError> {
    let id = config.provider_id()?;
    let provider = provider_from_config(id, config, env)?;
    tracing::debug!(provider = %id, "provider ready");

    Ok(fetch_weather_data(provider.as_ref()).await?)
}

/// Fetch and rewrite the README at `readme_path`.
///
/// README I/O problems are reported through the returned [`ReadmeUpdate`], not
/// as errors.
pub async fn run(
    config: &Config,
    env: &dyn EnvSource,
    readme_path: &Path,
    now: DateTime<Utc>,
) -> Result<ReadmeUpdate, RunError> {
    let offset = config.utc_offset()?;
    let data = fetch(config, env).await?;

    Ok(update_readme(readme_path, &data, now, offset).await)
}
