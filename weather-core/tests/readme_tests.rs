//! README rewriting against real files, and the full refresh against a mock API.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::{collections::HashMap, fs, io, path::Path, sync::Mutex};
use tempfile::TempDir;

use weather_core::{
    Config, ReadmeUpdate, RunError,
    readme::{END_MARKER, FileReadme, ReadmeStore, START_MARKER, update_store},
    runner, update_readme,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const HEADER: &str = "# Hi, I'm a developer\n\nWelcome to my profile.\n\n";
const FOOTER: &str = "\n\n## Projects\n\n- [tool](https://example.com)\n";

fn offset() -> FixedOffset {
    FixedOffset::east_opt(6 * 3600).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 14, 5, 0).unwrap()
}

fn write_readme(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("README.md");
    fs::write(&path, body).unwrap();
    path
}

fn initial_readme() -> String {
    format!("{HEADER}{START_MARKER}\nstale weather\n{END_MARKER}{FOOTER}")
}

fn marker_region(content: &str) -> &str {
    let start = content.find(START_MARKER).unwrap();
    let end = content.find(END_MARKER).unwrap() + END_MARKER.len();
    &content[start..end]
}

#[tokio::test]
async fn test_update_rewrites_marker_region() {
    let dir = TempDir::new().unwrap();
    let path = write_readme(&dir, &initial_readme());

    let outcome = update_readme(&path, "Cloudy|30|06:18|18:02|60|03d", now(), offset()).await;
    assert_eq!(outcome, ReadmeUpdate::Updated);

    let content = fs::read_to_string(&path).unwrap();
    let region = marker_region(&content);

    assert!(region.contains("Cloudy"));
    assert!(region.contains("30°C"));
    assert!(region.contains("06:18"));
    assert!(region.contains("18:02"));
    assert!(region.contains("60%"));
    assert!(region.contains("03d.png"));
    assert!(region.contains("Friday, October 16, 2026, 20:05 (UTC+6)"));
    assert!(!region.contains("stale weather"));

    assert!(content.starts_with(HEADER));
    assert!(content.ends_with(FOOTER));
}

#[tokio::test]
async fn test_update_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_readme(&dir, &initial_readme());
    let data = "Cloudy|30|06:18|18:02|60|03d";

    update_readme(&path, data, now(), offset()).await;
    let first = fs::read_to_string(&path).unwrap();

    update_readme(&path, data, now(), offset()).await;
    let second = fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(second.matches(START_MARKER).count(), 1);
    assert_eq!(second.matches(END_MARKER).count(), 1);
}

#[tokio::test]
async fn test_missing_file_is_reported_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("README.md");

    let outcome = update_readme(&path, "Cloudy|30|06:18|18:02|60|03d", now(), offset()).await;

    assert_eq!(outcome, ReadmeUpdate::ReadFailed);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_file_without_markers_is_left_unchanged() {
    let dir = TempDir::new().unwrap();
    let original = format!("{HEADER}no weather here{FOOTER}");
    let path = write_readme(&dir, &original);

    let outcome = update_readme(&path, "Cloudy|30|06:18|18:02|60|03d", now(), offset()).await;

    assert_eq!(outcome, ReadmeUpdate::MarkersMissing);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

/// Readable README whose writes are always refused, like a read-only mount.
struct ReadOnlyReadme {
    content: Mutex<String>,
}

#[async_trait]
impl ReadmeStore for ReadOnlyReadme {
    fn location(&self) -> String {
        "read-only README".to_string()
    }

    async fn read(&self) -> io::Result<String> {
        Ok(self.content.lock().unwrap().clone())
    }

    async fn write(&self, _content: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::ReadOnlyFilesystem, "read-only file system"))
    }
}

#[tokio::test]
async fn test_write_failure_is_reported_without_raising() {
    let store = ReadOnlyReadme {
        content: Mutex::new(initial_readme()),
    };

    let outcome = update_store(&store, "Cloudy|30|06:18|18:02|60|03d", now(), offset()).await;

    assert_eq!(outcome, ReadmeUpdate::WriteFailed);
    assert_eq!(*store.content.lock().unwrap(), initial_readme());
}

#[tokio::test]
async fn test_file_store_roundtrips_content() {
    let dir = TempDir::new().unwrap();
    let path = write_readme(&dir, &initial_readme());
    let store = FileReadme::new(&path);

    let outcome = update_store(&store, "Rain|21|05:59|18:30|88|10d", now(), offset()).await;
    assert_eq!(outcome, ReadmeUpdate::Updated);

    let content = store.read().await.unwrap();
    assert!(marker_region(&content).contains("**Rain**"));
    assert!(marker_region(&content).contains("10d.png"));
}

#[tokio::test]
async fn test_short_snapshot_renders_blank_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_readme(&dir, &initial_readme());

    let outcome = update_readme(&path, "Cloudy|30", now(), offset()).await;
    assert_eq!(outcome, ReadmeUpdate::Updated);

    let content = fs::read_to_string(&path).unwrap();
    let region = marker_region(&content);
    assert!(region.contains("**Cloudy**"));
    assert!(region.contains("**30°C**"));
    assert!(region.contains("Humidity: **%**"));
}

// ============================================================================
// Full refresh
// ============================================================================

fn onecall_body() -> serde_json::Value {
    serde_json::json!({
        "current": {
            "sunrise": 1705278600,
            "sunset": 1705318920,
            "temp": 29.6,
            "humidity": 60,
            "weather": [{ "main": "Clouds", "icon": "03d" }]
        }
    })
}

async fn onecall_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(onecall_body()))
        .mount(&mock_server)
        .await;
    mock_server
}

fn config_for(mock_server: &MockServer, readme: &Path) -> Config {
    let mut config = Config::default();
    config.openweather.base_url = format!("{}/onecall", mock_server.uri());
    config.readme_path = readme.to_path_buf();
    config
}

#[tokio::test]
async fn test_run_fetches_and_rewrites() {
    let mock_server = onecall_server().await;
    let dir = TempDir::new().unwrap();
    let path = write_readme(&dir, &initial_readme());
    let config = config_for(&mock_server, &path);
    let env = HashMap::from([("OPEN_WEATHER_KEY".to_string(), "k".to_string())]);

    let outcome = runner::run(&config, &env, &path, now()).await.unwrap();
    assert_eq!(outcome, ReadmeUpdate::Updated);

    let content = fs::read_to_string(&path).unwrap();
    let region = marker_region(&content);
    assert!(region.contains("**Clouds**"));
    assert!(region.contains("**30°C**"));
    assert!(region.contains("06:30:00"));
    assert!(region.contains("17:42:00"));
    assert!(region.contains("03d.png"));
}

#[tokio::test]
async fn test_run_without_key_never_calls_api() {
    let mock_server = onecall_server().await;
    let dir = TempDir::new().unwrap();
    let path = write_readme(&dir, &initial_readme());
    let config = config_for(&mock_server, &path);
    let env = HashMap::from([("OPEN_WEATHER_KEY".to_string(), "   ".to_string())]);

    let err = runner::run(&config, &env, &path, now()).await.unwrap_err();

    match err {
        RunError::Config(e) => {
            assert_eq!(e.to_string(), "❌ Missing required environment variable: OPEN_WEATHER_KEY");
        }
        other => panic!("expected a config error, got {other:?}"),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), initial_readme());
}

#[tokio::test]
async fn test_run_fetch_failure_leaves_readme_alone() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let path = write_readme(&dir, &initial_readme());
    let config = config_for(&mock_server, &path);
    let env = HashMap::from([("OPEN_WEATHER_KEY".to_string(), "k".to_string())]);

    let err = runner::run(&config, &env, &path, now()).await.unwrap_err();

    assert!(matches!(err, RunError::Fetch(_)), "got {err:?}");
    assert_eq!(err.to_string(), "❌ Weather data fetch failed. Check logs for details.");
    assert_eq!(fs::read_to_string(&path).unwrap(), initial_readme());
}

#[tokio::test]
async fn test_run_reports_missing_readme_as_outcome() {
    let mock_server = onecall_server().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.md");
    let config = config_for(&mock_server, &path);
    let env = HashMap::from([("OPEN_WEATHER_KEY".to_string(), "k".to_string())]);

    let outcome = runner::run(&config, &env, &path, now()).await.unwrap();
    assert_eq!(outcome, ReadmeUpdate::ReadFailed);
}
