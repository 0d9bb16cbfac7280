use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagetabs_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "pagetabs")]
#[command(author, version, about = "A paginated terminal image carousel with an animated tab indicator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the carousel
    Run,
    /// List the configured tabs
    Tabs,
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Log to a file under the data directory; the terminal belongs to the UI
fn init_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    init_logging(&config)?;
    tracing::info!("Configuration loaded from {}", AppConfig::config_path().display());

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(config).await,
        Some(Commands::Tabs) => commands::tabs::run(&config),
        Some(Commands::InitConfig { force }) => commands::init_config::run(force),
    }
}
