#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the Vitibrasil statistics.
//!
//! Each report endpoint maps its path onto a portal page, downloads and
//! extracts it, and answers with `{"data": [...]}`. When the portal cannot
//! be used the records come from a static snapshot instead and the
//! response carries an `X-Fallback: true` header.

pub mod config;
mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use vitibrasil_fallback::FallbackStore;
use vitibrasil_source::{SourceError, VitibrasilClient};

pub use config::{FallbackPolicy, ServerConfig};

/// Response header set on answers served from the fallback snapshot.
pub const FALLBACK_HEADER: &str = "X-Fallback";

/// Shared application state.
pub struct AppState {
    /// Client for the portal.
    pub client: VitibrasilClient,
    /// Snapshot served when the portal cannot be used.
    pub fallback: FallbackStore,
    /// Which failures are served from [`Self::fallback`].
    pub policy: FallbackPolicy,
}

impl AppState {
    /// Builds the state described by `config`, loading the fallback
    /// snapshot from disk.
    ///
    /// A missing or unreadable snapshot is logged and replaced by an empty
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the portal client cannot be built.
    pub fn from_config(config: &ServerConfig) -> Result<Self, SourceError> {
        let client = VitibrasilClient::new(&config.base_url, config.timeout)?;
        let fallback = FallbackStore::load_or_empty(&config.fallback_path);

        Ok(Self {
            client,
            fallback,
            policy: config.fallback_policy,
        })
    }
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(handlers::health))
        .service(
            web::scope("/api/v1")
                .route("/", web::get().to(handlers::welcome))
                .route("/producao/{ano}", web::get().to(handlers::production))
                .route(
                    "/processamento/{sub_aba}/{ano}",
                    web::get().to(handlers::processing),
                )
                .route(
                    "/comercializacao/{ano}",
                    web::get().to(handlers::commercialization),
                )
                .route("/importacao/{sub_aba}/{ano}", web::get().to(handlers::import))
                .route("/exportacao/{sub_aba}/{ano}", web::get().to(handlers::export)),
        );
}

/// Starts the API server with the configuration read from the environment.
///
/// Initializes logging first. This is a regular async function; the caller
/// is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the portal client cannot be
/// built, or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    serve(ServerConfig::from_env()).await
}

/// Starts the API server with `config`.
///
/// Logging is left to the caller.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the portal client cannot be
/// built, or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    log::info!(
        "Upstream {} (timeout {}s), fallback policy '{}'",
        config.base_url,
        config.timeout.as_secs(),
        config.fallback_policy
    );

    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;
    let state = web::Data::new(state);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
