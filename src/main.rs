mod choices;
mod config;
mod database;
mod entities;
mod formatting;
mod http_server;
mod logging;
mod services;
#[cfg(test)]
mod test_utils;
mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::init_tracing,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "BOOKING_DIRECTORY_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `booking_directory=debug,tower_http=debug`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// Path to log file
    #[arg(long, env = "BOOKING_DIRECTORY_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    /// OTLP collector endpoint for exporting traces
    #[arg(long, env = "OTLP_ENDPOINT", global = true)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP server
    Serve {
        /// The port to run the server on, overrides the config file
        #[arg(short, long, env = "BOOKING_DIRECTORY_HTTP_PORT")]
        port: Option<u16>,

        /// Directory served under /static, overrides the config file
        #[arg(long, env = "BOOKING_DIRECTORY_STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },
    /// Apply pending database migrations and exit
    Migrate,
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let tracer_provider = init_tracing(
        "booking-directory",
        args.otlp_endpoint.as_deref(),
        &args.log_level,
        args.log_file.as_deref(),
    )?;

    tracing::debug!("Booking directory starting");
    let result = run(args).await;

    if let Some(provider) = tracer_provider {
        if let Err(err) = provider.shutdown() {
            eprintln!("Failed to flush traces: {err}");
        }
    }

    result
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    tracing::debug!("Loading configuration");
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .with_context(|| "Failed to load booking-directory config")
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                tracing::info!("Default config written to: {}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Migrate => {
            let config = load_config(args.config.as_deref())?;
            Database::open(&config.database_path()).await?;
            tracing::info!("Migrations applied");
        }
        Commands::Serve { port, static_dir } => {
            let config = load_config(args.config.as_deref())?;
            let database = Database::open(&config.database_path()).await?;

            let port = port.unwrap_or(config.port);
            let static_dir = static_dir.unwrap_or_else(|| config.static_dir_path());
            tracing::info!("Starting HTTP server on port: {}", port);
            http_server::app::start(HttpServerConfig {
                port,
                database,
                static_dir,
            })
            .await?;
        }
    }

    Ok(())
}
