//! Rewrites the weather block of a Markdown README.
//!
//! The block is everything between [`START_MARKER`] and [`END_MARKER`], markers
//! included. The rendered replacement carries both markers again, so running
//! the update repeatedly keeps exactly one block in place.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use regex::{NoExpand, Regex};
use std::{
    io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use crate::{model::SnapshotFields, timefmt::refresh_stamp};

pub const START_MARKER: &str = "<!-- Hourly Weather Update -->";
pub const END_MARKER: &str = "<!-- End of Hourly Weather Update -->";

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// Non-greedy match from the start marker to the first end marker after it.
static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?s){}.*?{}",
        regex::escape(START_MARKER),
        regex::escape(END_MARKER)
    ))
    .unwrap()
});

/// What happened to the README. Never an error: README mutation is best effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadmeUpdate {
    Updated,
    /// No block was found, so the file was written back unchanged.
    MarkersMissing,
    ReadFailed,
    WriteFailed,
}

/// Render the full marker-delimited block for a serialized snapshot.
pub fn render_block(fields: &SnapshotFields<'_>, stamp: &str) -> String {
    format!(
        "{START_MARKER}\n\
         Currently, the weather is: **{description}** \
         <img src=\"{ICON_URL_BASE}/{icon}.png\" alt=\"{alt}\" height=\"24\"/>\n\
         \n\
         - Temperature: **{temperature}°C**\n\
         - Sunrise: **{sunrise}**\n\
         - Sunset: **{sunset}**\n\
         - Humidity: **{humidity}%**\n\
         \n\
         <sub>Last refreshed: {stamp}</sub>\n\
         {END_MARKER}",
        description = fields.description(),
        alt = fields.description().replace('"', "&quot;"),
        icon = fields.icon(),
        temperature = fields.temperature(),
        sunrise = fields.sunrise(),
        sunset = fields.sunset(),
        humidity = fields.humidity(),
    )
}

/// Replace the first weather block in `content` with `block`.
///
/// Returns `None` when `content` has no complete block.
pub fn replace_block(content: &str, block: &str) -> Option<String> {
    if !BLOCK_PATTERN.is_match(content) {
        return None;
    }

    Some(BLOCK_PATTERN.replace(content, NoExpand(block)).into_owned())
}

/// Where the README text lives.
#[async_trait]
pub trait ReadmeStore: Send + Sync {
    /// Shown in log lines.
    fn location(&self) -> String;

    async fn read(&self) -> io::Result<String>;

    async fn write(&self, content: &str) -> io::Result<()>;
}

/// A README on the local filesystem, read and overwritten whole.
#[derive(Debug, Clone)]
pub struct FileReadme {
    path: PathBuf,
}

impl FileReadme {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReadmeStore for FileReadme {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }

    async fn write(&self, content: &str) -> io::Result<()> {
        tokio::fs::write(&self.path, content).await
    }
}

/// Read `path`, swap in a freshly rendered block and write it back.
///
/// Failures are logged and reported through the returned [`ReadmeUpdate`].
pub async fn update_readme(
    path: &Path,
    weather_data: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> ReadmeUpdate {
    update_store(&FileReadme::new(path), weather_data, now, offset).await
}

/// [`update_readme`] against any [`ReadmeStore`].
pub async fn update_store(
    store: &dyn ReadmeStore,
    weather_data: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> ReadmeUpdate {
    let content = match store.read().await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(path = %store.location(), error = %e, "❌ Failed to read README");
            return ReadmeUpdate::ReadFailed;
        }
    };

    let fields = SnapshotFields::parse(weather_data);
    let block = render_block(&fields, &refresh_stamp(now, offset));

    let (updated, outcome) = match replace_block(&content, &block) {
        Some(updated) => (updated, ReadmeUpdate::Updated),
        None => {
            tracing::warn!(path = %store.location(), "⚠️ Weather markers not found in README, content left as is");
            (content, ReadmeUpdate::MarkersMissing)
        }
    };

    if let Err(e) = store.write(&updated).await {
        tracing::error!(path = %store.location(), error = %e, "❌ Failed to write README");
        return ReadmeUpdate::WriteFailed;
    }

    if outcome == ReadmeUpdate::Updated {
        tracing::info!(path = %store.location(), "✅ README updated successfully");
    }

    outcome
}
