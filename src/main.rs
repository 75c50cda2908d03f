//! TokenPair Server: paired access/refresh token issue and rotation.
//!
//! Main entry point that parses the command line, loads configuration,
//! initializes logging, and runs the selected command.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use tokenpair_core::config::{AppConfig, LoggingConfig};
use tokenpair_core::error::AppError;

/// TokenPair: issues and rotates paired access/refresh tokens.
#[derive(Debug, Parser)]
#[command(name = "tokenpair-server", version, about, long_about = None)]
struct Cli {
    /// Configuration environment overlay (`config/<env>.toml`).
    /// Falls back to `TOKENPAIR_ENV`, then `development`.
    #[arg(short, long)]
    env: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Apply pending session-store migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(cli.env.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => tokenpair_api::run_server(config).await,
        Commands::Migrate => migrate(&config).await,
    };

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load and validate configuration from files and environment.
fn load_configuration(env: Option<&str>) -> Result<AppConfig, AppError> {
    let env = env
        .map(String::from)
        .or_else(|| std::env::var("TOKENPAIR_ENV").ok())
        .unwrap_or_else(|| "development".to_string());

    let config = AppConfig::load(&env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Run the PostgreSQL migrations against the configured database.
async fn migrate(config: &AppConfig) -> Result<(), AppError> {
    if config.database.provider != "postgres" {
        tracing::info!(
            provider = %config.database.provider,
            "Session store has no migrations"
        );
        return Ok(());
    }

    let db = tokenpair_database::DatabasePool::connect(&config.database).await?;
    tokenpair_database::migration::run_migrations(db.pool()).await?;
    db.close().await;
    Ok(())
}
