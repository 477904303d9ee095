use crate::{
    Config, WeatherSnapshot,
    env::{EnvSource, validate_environment},
    model::{DEFAULT_DESCRIPTION, DEFAULT_ICON},
    provider::{openmeteo::OpenMeteoProvider, openweather::OpenWeatherProvider},
    timefmt::epoch_to_clock,
};
use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::RequestBuilder;
use std::{convert::TryFrom, fmt, fmt::Debug};
use thiserror::Error;

pub mod openmeteo;
pub mod openweather;
pub mod wmo;

/// Why a fetch failed. Only ever logged and inspected, never shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    Network,
    HttpStatus(u16),
    Parse,
    Validation,
}

/// The single error every fetch failure converges to.
///
/// The message is fixed so callers never branch on the cause; the cause is
/// logged where it happens and kept in `failure()` for diagnostics.
#[derive(Debug, Error)]
#[error("❌ Weather data fetch failed. Check logs for details.")]
pub struct FetchError {
    failure: FetchFailure,
}

impl FetchError {
    pub(crate) fn new(failure: FetchFailure) -> Self {
        Self { failure }
    }

    pub fn failure(&self) -> FetchFailure {
        self.failure
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::OpenMeteo => "openmeteo",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::OpenMeteo]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "openmeteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, openmeteo."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_snapshot(&self) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct a provider from config.
///
/// Providers that need a credential have it validated first; a missing one is
/// returned as a `ConfigError` inside the `anyhow::Error`.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
    env: &dyn EnvSource,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::OpenWeather => {
            let api_key = validate_environment(env, &config.openweather)?;
            Box::new(OpenWeatherProvider::new(api_key, config)?)
        }
        ProviderId::OpenMeteo => Box::new(OpenMeteoProvider::new(config)?),
    };

    Ok(boxed)
}

/// Fetch current conditions and serialize them for the README updater.
pub async fn fetch_weather_data(provider: &dyn WeatherProvider) -> Result<String, FetchError> {
    tracing::info!("🌍 Fetching weather data...");
    let snapshot = provider.current_snapshot().await?;
    let data = snapshot.to_string();
    tracing::info!(weather = %data, "✅ Weather data fetched");
    Ok(data)
}

/// Send a GET and parse the body as JSON. One attempt, no retry.
pub(crate) async fn get_json(request: RequestBuilder) -> Result<serde_json::Value, FetchError> {
    let res = request.send().await.map_err(|e| {
        // the request URL carries the API key
        tracing::error!(error = %e.without_url(), "❌ Network error while fetching weather data");
        FetchError::new(FetchFailure::Network)
    })?;

    let status = res.status();
    let body = res.text().await.map_err(|e| {
        tracing::error!(error = %e.without_url(), "❌ Failed to read weather API response body");
        FetchError::new(FetchFailure::Network)
    })?;

    if !status.is_success() {
        tracing::error!(
            status = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("unknown"),
            body = %truncate_body(&body),
            "❌ Weather API request failed"
        );
        return Err(FetchError::new(FetchFailure::HttpStatus(status.as_u16())));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(error = %e, "❌ Weather API returned malformed JSON");
        FetchError::new(FetchFailure::Parse)
    })
}

/// Deserialize an already-parsed payload into its expected shape.
pub(crate) fn validate_shape<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(validation_failed)
}

pub(crate) fn validation_failed(details: impl fmt::Display) -> FetchError {
    tracing::error!(details = %details, "❌ Weather API response failed validation");
    FetchError::new(FetchFailure::Validation)
}

/// Provider-independent raw reading, before formatting.
#[derive(Debug)]
pub(crate) struct RawReading<'a> {
    pub description: Option<&'a str>,
    pub icon: Option<&'a str>,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub sunrise_epoch: f64,
    pub sunset_epoch: f64,
}

impl RawReading<'_> {
    pub fn into_snapshot(self, offset: FixedOffset) -> Result<WeatherSnapshot, FetchError> {
        if !(0.0..=100.0).contains(&self.humidity_pct) {
            return Err(validation_failed(format_args!(
                "humidity {} outside 0-100",
                self.humidity_pct
            )));
        }

        let clock = |what: &str, epoch: f64| {
            epoch_to_clock(epoch as i64, offset)
                .ok_or_else(|| validation_failed(format_args!("{what} {epoch} is not a valid epoch")))
        };

        Ok(WeatherSnapshot {
            description: non_blank(self.description).unwrap_or(DEFAULT_DESCRIPTION).to_string(),
            temperature_c: round_half_up(self.temperature_c),
            sunrise: clock("sunrise", self.sunrise_epoch)?,
            sunset: clock("sunset", self.sunset_epoch)?,
            humidity_pct: round_half_up(self.humidity_pct) as u8,
            icon: non_blank(self.icon).unwrap_or(DEFAULT_ICON).to_string(),
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Rounds halves towards positive infinity, so -2.5 becomes -2.
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
