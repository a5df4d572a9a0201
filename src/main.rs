use anyhow::Result;
use cardwizz_auth::{config::Config, migration, server, telemetry};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "cardwizz-auth", version, about = "CardWizz sign-in backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Create the database and apply MySQL migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let metrics_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting {}", config.telemetry.service_name);
            info!("HTTP server listening on {}", config.http_addr());
            server::run(config, metrics_handle).await
        }
        Command::Migrate => migration::run_migrations(config.database()?).await,
    }
}
