#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the crime risk pipeline.
//!
//! `POST /api/risk` downloads an incident CSV, runs the pipeline on a
//! blocking worker, and answers with per-area totals and predicted tiers.
//! Every pipeline failure is logged and collapsed into one generic error
//! envelope.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, middleware, web};
use crime_risk_analytics::PipelineError;
use crime_risk_analytics::config::{PipelineConfig, load_from_env};
use crime_risk_ingest::IngestError;
use crime_risk_server_models::ApiRiskResponse;

pub use handlers::process;

/// Errors that can occur while serving a risk request.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Downloading or parsing the CSV failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A pipeline stage failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The blocking worker running the pipeline was lost.
    #[error("Blocking task failed: {0}")]
    Blocking(String),
}

/// Shared application state.
pub struct AppState {
    /// Pipeline configuration applied to every request.
    pub config: Arc<PipelineConfig>,
}

/// Registers the `/api` routes.
///
/// Request bodies that fail to parse get the same generic failure envelope
/// as a failed run.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(reject_body))
            .route("/health", web::get().to(handlers::health))
            .route("/risk", web::post().to(handlers::risk)),
    );
}

fn reject_body(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::error!("Rejected request body for {}: {err}", req.path());
    let response = HttpResponse::InternalServerError().json(ApiRiskResponse::failure());
    InternalError::from_response(err, response).into()
}

/// Starts the crime risk API server.
///
/// Loads the pipeline config (see [`load_from_env`]) and binds to
/// `BIND_ADDR`:`PORT` (default `127.0.0.1:8080`). The caller provides the
/// async runtime and initialises logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the config cannot be loaded, the
/// server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    log::info!("Loading pipeline config...");
    let config = load_from_env().map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState {
        config: Arc::new(config),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
