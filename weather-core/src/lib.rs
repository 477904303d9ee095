//! Core library for the `readme-weather` tool.
//!
//! This crate defines:
//! - Configuration and environment (credential) handling
//! - Weather providers and response validation
//! - The serialized weather snapshot handed between steps
//! - Rewriting the marker-delimited weather block of a README
//!
//! It is used by `readme-weather`, but the pieces can be driven on their own.

pub mod config;
pub mod env;
pub mod model;
pub mod provider;
pub mod readme;
pub mod runner;
pub mod timefmt;

pub use config::Config;
pub use env::{ConfigError, EnvSource, ProcessEnv};
pub use model::{SnapshotFields, WeatherSnapshot};
pub use provider::{FetchError, FetchFailure, ProviderId, WeatherProvider, fetch_weather_data};
pub use readme::{ReadmeUpdate, update_readme};
pub use runner::RunError;
