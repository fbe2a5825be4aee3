use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use weather_core::{
    Config, UnitGroup, WeatherQuery, WeatherService, lookup, model::DEFAULT_REQUESTER_NAME,
    provider::provider_from_config,
};
use weather_server::{AppState, WEATHER_ENDPOINT, create_router};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather forecast proxy")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service.
    Serve {
        /// Address to bind, overrides `[server] host`.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides `[server] port`.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Look up one day's forecast and print it as JSON.
    Fetch {
        /// Location name, address or "lat,lon".
        location: String,

        /// Date or date keyword understood by the provider, e.g. "2024-01-15" or "today".
        date: String,

        /// Unit group: metric, us, uk or base. Defaults to the configured one.
        #[arg(long)]
        unit: Option<String>,

        /// Name reported as the requester.
        #[arg(long, default_value = DEFAULT_REQUESTER_NAME)]
        name: String,
    },

    /// Print where the optional config file is looked up.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { host, port } => {
                let mut config = Config::load(self.config.as_deref())?;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                serve(&config).await
            }
            Command::Fetch { location, date, unit, name } => {
                let config = Config::load(self.config.as_deref())?;
                let unit = match unit {
                    Some(unit) => UnitGroup::try_from(unit.as_str())?,
                    None => config.upstream.unit_group,
                };

                let provider = provider_from_config(&config)?;
                let query = WeatherQuery { location, date, requester_name: name };

                let response = lookup(provider.as_ref(), query, unit).await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let service = WeatherService::from_config(config)?;
    info!(unit = %service.unit(), upstream = %config.upstream.base_url, "Configuration loaded");

    let app = create_router(AppState::new(service)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener =
        TcpListener::bind(&addr).await.with_context(|| format!("Failed to bind {addr}"))?;
    let local: SocketAddr = listener.local_addr()?;

    info!("Server listening on http://{local}");
    info!("Weather endpoint: POST http://{local}{WEATHER_ENDPOINT}");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
