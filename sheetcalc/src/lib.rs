//! # sheetcalc: spreadsheet calculation service
//!
//! `sheetcalc` accepts an `.xlsx` upload, reads the number in cell A1 of its active sheet, computes
//! a derived value (currently: twice the input), and returns a new workbook containing both.
//!
//! ## Request Flow
//!
//! A `POST /run` request is handled in one synchronous chain:
//!
//! 1. The [`api::handlers::run`] handler checks the filename (`.xlsx`, case-insensitive) and
//!    buffers the upload while enforcing the size ceiling from [`config::LimitsConfig`].
//! 2. A fresh [`types::JobId`] is assigned and the upload is written to the uploads directory
//!    by [`storage::Storage`].
//! 3. The [`engine`] loads the workbook, validates A1, and writes the result workbook to the
//!    outputs directory. This runs on the blocking thread pool.
//! 4. The result is streamed back as `output.xlsx`.
//!
//! Requests share no mutable state; the only coordination is the uniqueness of job ids.
//!
//! Failures are mapped by [`errors::Error`]: bad input becomes a 4xx with a readable message,
//! anything unexpected becomes a 500 naming one of a small set of error categories.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use sheetcalc::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = sheetcalc::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     sheetcalc::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod engine;
pub mod errors;
mod openapi;
mod static_assets;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use openapi::ApiDoc;
use storage::Storage;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::JobId;

/// Application state shared across all request handlers.
///
/// Holds only immutable configuration and the storage layout; request handling needs no
/// shared mutable state.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .storage(Storage::new(&config.storage))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub storage: Storage,
}

/// Build the HTTP router for the given state.
pub fn build_router(state: &AppState) -> Router {
    // Upload route carries its own body limit, sized from config with room for multipart framing
    let upload_limit = state.config.limits.max_upload_bytes + api::handlers::run::MULTIPART_OVERHEAD_BYTES;
    let upload_limit = usize::try_from(upload_limit).unwrap_or(usize::MAX);

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route(
            "/run",
            post(api::handlers::run::run).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/", get(api::handlers::static_assets::serve_embedded_asset))
        .with_state(state.clone())
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback_service(get(api::handlers::static_assets::serve_embedded_asset))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Main application struct that owns the router and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] creates the storage directories and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles requests until the
///    shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting sheetcalc with configuration: {:#?}", config);

        let storage = Storage::new(&config.storage);
        storage
            .ensure_dirs()
            .await
            .context("Failed to create storage directories")?;

        let app_state = AppState::builder().config(config.clone()).storage(storage).build();
        let router = build_router(&app_state);

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "sheetcalc listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
