mod cli;

use std::io::ErrorKind;
use std::net::SocketAddr;

use anyhow::Context;
use axum::{Router, routing::get, response::Html};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use solar_efficiency::api_docs::ApiDoc;
use solar_efficiency::config::Config;
use solar_efficiency::error::ConfigError;
use solar_efficiency::routes::api_routes::api_routes;
use solar_efficiency::services::energy::{self, DateFilter};
use solar_efficiency::services::solar_algorithm;
use solar_efficiency::services::telemetry_service::TelemetryClient;
use solar_efficiency::shared_state::AppState;

use crate::cli::{Args, Command};

fn load_config(path: &str) -> anyhow::Result<Config> {
    match Config::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            tracing::warn!(path, "config file not found, using built-in site and DST table");
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("failed to load {path}")),
    }
}

async fn serve(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    let server_port = port.unwrap_or(config.server.port);
    let state = AppState::new(config);

    let app = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], server_port));
    tracing::info!("API Server listening on http://{}", addr);
    tracing::info!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .context("HTTP server stopped")
}

async fn energy_command(
    config: Config,
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
    filter: DateFilter,
) -> anyhow::Result<()> {
    let telemetry = config
        .telemetry
        .context("no \"telemetry\" section in the configuration")?;
    let client = TelemetryClient::new(telemetry)?;
    let samples = match (start, end) {
        (Some(start), Some(end)) => client.power_samples(start, end).await?,
        _ => client.full_history().await?,
    };
    let report = energy::energy_report(&samples, filter);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)?;
    tracing::info!(
        latitude = config.site.latitude,
        longitude = config.site.longitude,
        arrays = config.site.arrays.len(),
        dst_years = config.daylight_saving.periods.len(),
        "configuration loaded"
    );

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(config, port).await,
        Command::Observe { timestamp } => {
            let obs = solar_algorithm::compute_observation(&timestamp, &config.site, &config.daylight_saving)?;
            println!("{}", serde_json::to_string_pretty(&obs)?);
            Ok(())
        }
        Command::Sweep { date, step } => {
            let sweep = solar_algorithm::sweep_day(date, step, &config.site, &config.daylight_saving)?;
            for obs in &sweep {
                println!(
                    "{} | elev {:>7.2}° | azi {:>6.2}° | atmos {:.3} | total {:.3}",
                    obs.timestamp.format("%H:%M"),
                    obs.elevation_deg,
                    obs.azimuth_deg,
                    obs.attenuation,
                    obs.total_efficiency
                );
            }
            Ok(())
        }
        Command::Energy { start, end, year, month, day } => {
            let filter = DateFilter::from_parts(year, month, day)
                .context("invalid --year/--month/--day selection")?;
            energy_command(config, start, end, filter).await
        }
    }
}
