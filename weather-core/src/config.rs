use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::ProviderId;

/// Fixed location the weather is reported for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Offset applied to sunrise/sunset and the refresh stamp, in seconds east of UTC.
    pub utc_offset_secs: i32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 23.8759,
            longitude: 90.3795,
            utc_offset_secs: 6 * 3600,
        }
    }
}

/// Settings for the OpenWeather one-call provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherSettings {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for OpenWeatherSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/3.0/onecall".to_string(),
            api_key_env: "OPEN_WEATHER_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Settings for the keyless Open-Meteo provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenMeteoSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenMeteoSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Top-level configuration, optionally read from a TOML file.
///
/// Example TOML:
/// ```toml
/// provider = "openweather"
/// readme_path = "README.md"
///
/// [location]
/// latitude = 23.8759
/// longitude = 90.3795
/// utc_offset_secs = 21600
///
/// [openweather]
/// api_key_env = "OPEN_WEATHER_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider id, "openweather" or "openmeteo".
    pub provider: String,
    pub readme_path: PathBuf,
    pub location: LocationConfig,
    pub openweather: OpenWeatherSettings,
    pub openmeteo: OpenMeteoSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderId::OpenWeather.to_string(),
            readme_path: PathBuf::from("README.md"),
            location: LocationConfig::default(),
            openweather: OpenWeatherSettings::default(),
            openmeteo: OpenMeteoSettings::default(),
        }
    }
}

impl Config {
    /// Load config from `explicit` if given, else from the platform config
    /// file if it exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::config_file_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.utc_offset()?;
        cfg.provider_id()?;
        Ok(cfg)
    }

    /// Path to the platform config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "readme-weather", "readme-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn provider_id(&self) -> Result<ProviderId> {
        ProviderId::try_from(self.provider.as_str())
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.location.utc_offset_secs).ok_or_else(|| {
            anyhow!(
                "Invalid utc_offset_secs {}: must be strictly between -86400 and 86400",
                self.location.utc_offset_secs
            )
        })
    }
}
