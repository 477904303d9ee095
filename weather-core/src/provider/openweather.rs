use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt, time::Duration};

use crate::{
    Config, WeatherSnapshot,
    config::{LocationConfig, OpenWeatherSettings},
    provider::{FetchError, RawReading, get_json, validate_shape, validation_failed},
};

use super::WeatherProvider;

/// Parts of the one-call response that are not wanted.
const EXCLUDE: &str = "minutely,hourly,daily,alerts";

/// OpenWeather one-call API, current conditions only.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    settings: OpenWeatherSettings,
    location: LocationConfig,
    offset: FixedOffset,
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("api_key", &"<redacted>")
            .field("settings", &self.settings)
            .field("location", &self.location)
            .field("offset", &self.offset)
            .finish()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.openweather.timeout_secs))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            http,
            settings: config.openweather.clone(),
            location: config.location.clone(),
            offset: config.utc_offset()?,
        })
    }

    async fn fetch_current(&self) -> Result<WeatherSnapshot, FetchError> {
        let request = self.http.get(&self.settings.base_url).query(&[
            ("lat", self.location.latitude.to_string()),
            ("lon", self.location.longitude.to_string()),
            ("exclude", EXCLUDE.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]);

        tracing::debug!(url = %self.settings.base_url, "requesting OpenWeather current conditions");
        let value = get_json(request).await?;
        let parsed: OwResponse = validate_shape(value)?;
        let current = parsed.current;

        let condition = current
            .weather
            .first()
            .ok_or_else(|| validation_failed("current.weather must contain at least one condition"))?;

        RawReading {
            description: condition.main.as_deref(),
            icon: condition.icon.as_deref(),
            temperature_c: current.temp,
            humidity_pct: current.humidity,
            sunrise_epoch: current.sunrise,
            sunset_epoch: current.sunset,
        }
        .into_snapshot(self.offset)
    }
}

#[derive(Debug, Deserialize)]
struct OwCondition {
    main: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    temp: f64,
    humidity: f64,
    sunrise: f64,
    sunset: f64,
    weather: Vec<OwCondition>,
}

#[derive(Debug, Deserialize)]
struct OwResponse {
    current: OwCurrent,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_snapshot(&self) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current().await
    }
}
