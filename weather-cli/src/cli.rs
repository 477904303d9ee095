use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use weather_core::{
    Config, EnvSource, ProviderId, ReadmeUpdate, RunError, SnapshotFields,
    readme::render_block, runner, timefmt::refresh_stamp,
};

const DEFAULT_LOG_LEVEL: Level = Level::INFO;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "readme-weather",
    version,
    about = "Refresh the weather block of a profile README"
)]
pub struct Cli {
    /// Path to a TOML config file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Weather provider, "openweather" or "openmeteo". Overrides the config file.
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[arg(long, global = true, default_value_t = DEFAULT_LOG_LEVEL)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch current weather and rewrite the README block (the default).
    Update {
        /// README to rewrite. Overrides the config file.
        #[arg(long)]
        readme: Option<PathBuf>,

        /// Print the rendered block instead of writing the README.
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch current weather and print the serialized snapshot.
    Show,
}

impl Cli {
    pub async fn run(self, env: &dyn EnvSource) -> Result<(), RunError> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(provider) = self.provider {
            config.provider = ProviderId::try_from(provider.as_str())?.to_string();
        }

        let command = self.command.unwrap_or(Command::Update {
            readme: None,
            dry_run: false,
        });

        match command {
            Command::Update { readme, dry_run: false } => {
                let path = readme.unwrap_or_else(|| config.readme_path.clone());
                match runner::run(&config, env, &path, Utc::now()).await? {
                    ReadmeUpdate::Updated => {}
                    ReadmeUpdate::MarkersMissing => {
                        tracing::warn!("⚠️ No changes made to README");
                    }
                    ReadmeUpdate::ReadFailed | ReadmeUpdate::WriteFailed => {
                        tracing::warn!("⚠️ README was not updated, see errors above");
                    }
                }
            }
            Command::Update { dry_run: true, .. } => {
                let offset = config.utc_offset()?;
                let data = runner::fetch(&config, env).await?;
                let stamp = refresh_stamp(Utc::now(), offset);
                println!("{}", render_block(&SnapshotFields::parse(&data), &stamp));
            }
            Command::Show => {
                let data = runner::fetch(&config, env).await?;
                println!("{data}");
            }
        }

        Ok(())
    }
}

/// Install a stderr `tracing` subscriber capped at `level`.
pub fn init_tracing(level: Level) -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .context("failed to set tracing subscriber")
}
