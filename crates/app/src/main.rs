mod cli;
mod config;
mod coordinator;
mod detail;
mod state;
mod ui;
mod wiring;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{AppConfig, ConfigError};
use crate::ui::UiError;
use crate::wiring::WiringError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),
    #[error("ui error: {0}")]
    Ui(#[from] UiError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    config::load_dotenv()?;
    let config = AppConfig::from_env()?;
    init_tracing(&config)?;
    info!(base_url = %config.base_url, "starting");

    let state = wiring::build_state(config)?;
    ui::run(state, cli.query).await?;
    Ok(())
}

/// Logs go to a file, never to the terminal the UI owns. Without a
/// configured file, tracing stays uninitialized and events are dropped.
fn init_tracing(config: &AppConfig) -> Result<(), std::io::Error> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = std::fs::File::options().create(true).append(true).open(path)?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}
