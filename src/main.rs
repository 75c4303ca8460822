use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chess_profile::api::{build_router, state::AppState};
use chess_profile::calculate::ProfileEngine;
use chess_profile::config::AppConfig;
use chess_profile::dispatch::Dispatcher;
use chess_profile::render::render_profile;
use chess_profile::sources::SourceRegistry;

#[derive(Parser)]
#[command(name = "chess-profile")]
#[command(about = "Statistical chess player profiles from online game history")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Compute one profile and print it
    Profile {
        /// Site to fetch games from (e.g. "lichess")
        #[arg(long, default_value = "lichess")]
        site: String,

        /// Username
        #[arg(long)]
        user: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Html,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher> {
    let registry = SourceRegistry::from_config(config).context("Failed to set up game sources")?;
    let engine = ProfileEngine::new(config.engine.clone())?;
    Ok(Dispatcher::new(
        registry,
        engine,
        Duration::from_secs(config.dispatch.request_timeout_seconds),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting chess-profile v{}", env!("CARGO_PKG_VERSION"));

    let dispatcher = build_dispatcher(&config)?;
    if dispatcher.registry().is_empty() {
        tracing::warn!("No game sources enabled");
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let mut state = AppState::new(dispatcher);
            state.cors_origin = config.server.cors_origin;
            let app = build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Profile { site, user, format } => {
            let profile = dispatcher.profile(&site, &user).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
                OutputFormat::Html => println!("{}", render_profile(&profile)),
            }
        }
    }

    Ok(())
}
