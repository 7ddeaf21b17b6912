#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the screening map dashboard.
//!
//! Serves the list of collection periods and, for a selected period, the
//! site summary table, period average, Moran's I result, and the map view
//! with its site features. Handlers only select the period and serialize
//! the result; every statistic comes from
//! [`screening_map_analytics::pipeline::analyze_period`].

mod handlers;

use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use screening_map_map::MapDataBuilder;
use screening_map_map_models::MapConfig;
use screening_map_source::{DEFAULT_DATA_DIR, DEFAULT_PERIOD_COUNT, PeriodSource, SourceConfig};

/// Shared application state. Immutable; each request builds its own
/// analysis.
pub struct AppState {
    /// Period data files.
    pub source: PeriodSource,
    /// Map view settings returned with every analysis.
    pub map_config: MapConfig,
    /// Feature builder for the configured palette.
    pub map_builder: MapDataBuilder,
}

impl AppState {
    /// Builds the state from a source and map configuration.
    ///
    /// # Errors
    ///
    /// Returns [`screening_map_map::MapError`] if the map palette is empty.
    pub fn new(
        source: PeriodSource,
        map_config: MapConfig,
    ) -> Result<Self, screening_map_map::MapError> {
        let map_builder = MapDataBuilder::new(&map_config)?;
        Ok(Self {
            source,
            map_config,
            map_builder,
        })
    }
}

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind (`BIND_ADDR`, default `127.0.0.1`).
    pub bind_addr: String,
    /// Port to listen on (`PORT`, default 8080).
    pub port: u16,
    /// Directory of period CSV files (`DATA_DIR`, default `data`).
    pub data_dir: PathBuf,
    /// Number of periods (`PERIOD_COUNT`, default 8).
    pub period_count: u32,
    /// Optional map config override (`MAP_CONFIG`).
    pub map_config_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads the configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_dir: std::env::var("DATA_DIR")
                .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            period_count: std::env::var("PERIOD_COUNT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PERIOD_COUNT),
            map_config_path: std::env::var("MAP_CONFIG").ok().map(PathBuf::from),
        }
    }
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/periods", web::get().to(handlers::periods))
            .route(
                "/periods/{period}/analysis",
                web::get().to(handlers::period_analysis),
            )
            .route("/analyze", web::post().to(handlers::analyze)),
    );
}

/// Starts the screening map API server.
///
/// Reads [`ServerConfig`] from the environment, loads the map
/// configuration, and serves until shut down. The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the map configuration is invalid,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();

    log::info!("Loading map configuration...");
    let map_config =
        MapConfig::load(config.map_config_path.as_deref()).map_err(std::io::Error::other)?;

    let source = PeriodSource::new(SourceConfig {
        data_dir: config.data_dir.clone(),
        period_count: config.period_count,
    });
    log::info!(
        "Serving {} periods from {}",
        config.period_count,
        config.data_dir.display()
    );

    let state = web::Data::new(AppState::new(source, map_config).map_err(std::io::Error::other)?);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
