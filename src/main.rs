use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::http::StatusCode;
use clap::Parser;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use farescan::web::{self, AppState};
use farescan::{
    ExchangeRates, FarescanConfig, FlightBridgeClient, LiteApiClient, TripPlanner, telemetry,
};

#[derive(Parser)]
#[command(name = "farescan")]
#[command(about = "Cheapest flight of the month plus a matching hotel")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = FarescanConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let _telemetry = telemetry::init(&config.logging, &config.telemetry, cli.verbose)?;
    info!("Starting farescan {}", farescan::VERSION);

    let flights = Arc::new(FlightBridgeClient::new(&config.flights)?);
    let hotels = Arc::new(LiteApiClient::new(&config.hotels)?);
    let planner = TripPlanner::new(
        flights,
        hotels,
        ExchangeRates::from_config(&config.exchange),
    );

    let state = AppState::new(planner, config.access.key.clone());
    if state.access_key.is_some() {
        info!("Access key required on every request");
    }

    let app = web::router(state).layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.server.request_timeout_seconds.into()),
    ));
    web::serve(&config.server, app).await
}
