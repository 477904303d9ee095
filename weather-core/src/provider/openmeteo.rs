use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    Config, WeatherSnapshot,
    config::{LocationConfig, OpenMeteoSettings},
    provider::{FetchError, RawReading, get_json, validate_shape, validation_failed, wmo},
};

use super::WeatherProvider;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,is_day";
const DAILY_FIELDS: &str = "sunrise,sunset";

/// Open-Meteo forecast API. Needs no credential.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    settings: OpenMeteoSettings,
    location: LocationConfig,
    offset: FixedOffset,
}

impl OpenMeteoProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.openmeteo.timeout_secs))
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self {
            http,
            settings: config.openmeteo.clone(),
            location: config.location.clone(),
            offset: config.utc_offset()?,
        })
    }

    async fn fetch_current(&self) -> Result<WeatherSnapshot, FetchError> {
        let request = self.http.get(&self.settings.base_url).query(&[
            ("latitude", self.location.latitude.to_string()),
            ("longitude", self.location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            // epoch seconds keep sunrise/sunset independent of the API's timezone handling
            ("timeformat", "unixtime".to_string()),
            ("timezone", "GMT".to_string()),
            ("forecast_days", "1".to_string()),
        ]);

        tracing::debug!(url = %self.settings.base_url, "requesting Open-Meteo current conditions");
        let value = get_json(request).await?;
        let parsed: OmResponse = validate_shape(value)?;

        let sunrise = *parsed
            .daily
            .sunrise
            .first()
            .ok_or_else(|| validation_failed("daily.sunrise must not be empty"))?;
        let sunset = *parsed
            .daily
            .sunset
            .first()
            .ok_or_else(|| validation_failed("daily.sunset must not be empty"))?;

        let current = parsed.current;
        let is_day = current.is_day.is_none_or(|d| d != 0);
        let (description, icon) = wmo::condition(current.weather_code, is_day);

        RawReading {
            description: Some(description),
            icon: Some(icon.as_str()),
            temperature_c: current.temperature_2m,
            humidity_pct: current.relative_humidity_2m,
            sunrise_epoch: sunrise,
            sunset_epoch: sunset,
        }
        .into_snapshot(self.offset)
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: Option<u16>,
    is_day: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    sunrise: Vec<f64>,
    sunset: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: OmCurrent,
    daily: OmDaily,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current_snapshot(&self) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current().await
    }
}
