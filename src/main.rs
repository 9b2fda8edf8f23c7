//! FilePick — lazy tree browser with tri-state selection and bulk indexing
//!
//! Main entry point: loads configuration, initializes logging and runs the
//! selected command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use filepick_core::config::AppConfig;
use filepick_core::config::logging::LoggingConfig;
use filepick_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = cli.execute(config).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file, overlay and environment
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let config_path = std::env::var("FILEPICK_CONFIG").unwrap_or_else(|_| cli.config.clone());
    let env = cli
        .env
        .clone()
        .or_else(|| std::env::var("FILEPICK_ENV").ok())
        .unwrap_or_else(|| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
