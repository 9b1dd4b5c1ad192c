//! # empresas: Companies and Partners REST API
//!
//! `empresas` is a small CRUD service for companies (`empresas`) and the partners (`socios`)
//! that belong to them. It exposes a JSON API under `/api/empresas`, persists everything in
//! SQLite and publishes an OpenAPI document generated from the handlers themselves.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! [SQLx](https://github.com/launchbadge/sqlx) over SQLite for persistence. The database is
//! either embedded (in memory, or a file under a data directory) or any external SQLite URL.
//!
//! ### Request Flow
//!
//! A request is dispatched by path and method to a handler in [`api::handlers`]. The handler
//! opens a transaction, resolves the entities named in the path (404 if any is missing), parses
//! and validates the body (400), performs its writes through the repositories in
//! [`db::handlers`], commits and serializes an explicit response model from [`api::models`].
//! Dropping the transaction on any error path rolls it back, so a failed request never leaves
//! partial writes behind.
//!
//! ### Data Model
//!
//! Every partner belongs to exactly one company through a mandatory foreign key. Deleting a
//! company deletes its partners through `ON DELETE CASCADE`, and SQLite foreign key enforcement
//! is switched on for every connection.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use empresas::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = empresas::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize telemetry (structured logging and optional OpenTelemetry)
//!     empresas::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     // Create and start the application
//!     let app = Application::new(config).await?;
//!
//!     // Run with graceful shutdown on Ctrl+C
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
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::config::CorsOrigin;
use axum::{
    Json, Router,
    http::{self, HeaderValue, Method},
    routing::get,
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use openapi::ApiDoc;
pub use types::{CompanyId, PartnerId};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}

/// Get the empresas database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to the configured database and bring its schema up to date
#[instrument(skip_all)]
async fn setup_database(config: &Config) -> anyhow::Result<SqlitePool> {
    match &config.database {
        config::DatabaseConfig::Embedded { persistent, .. } => {
            info!("Starting with embedded database (persistent: {})", persistent);
        }
        config::DatabaseConfig::External { .. } => {
            info!("Using external database");
        }
    }

    let pool = db::pools::connect(&config.database).await?;
    migrator().run(&pool).await?;

    Ok(pool)
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Url serializes a bare origin with a trailing slash, which browsers never send
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Company and partner routes under `/api/empresas`
/// - Health check at `/healthz`
/// - OpenAPI document and Scalar UI (when `enable_docs` is set)
/// - Optional Prometheus metrics at `/internal/metrics`
/// - CORS configuration
/// - Tracing middleware
///
/// # Errors
///
/// Returns an error if the CORS configuration cannot be turned into header values.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{companies, partners};

    let api_routes = Router::new()
        .route("/api/empresas", get(companies::list_companies).post(companies::create_company))
        .route(
            "/api/empresas/{id}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/api/empresas/{empresaId}/socios",
            get(partners::list_partners).post(partners::create_partner),
        )
        .route(
            "/api/empresas/{empresaId}/socios/{id}",
            get(partners::get_partner)
                .put(partners::update_partner)
                .delete(partners::delete_partner),
        )
        .with_state(state.clone());

    let mut router = Router::new().route("/healthz", get(|| async { "OK" })).merge(api_routes);

    if state.config.enable_docs {
        router = router
            .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
            .merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    // Create CORS layer from config
    let cors_layer = create_cors_layer(&state.config)?;
    router = router.layer(cors_layer);

    // Add Prometheus metrics if enabled
    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route("/internal/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    // Add tracing layer
    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database, runs migrations and builds the
///    router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, closes the pool and flushes telemetry
pub struct Application {
    router: Router,
    config: Config,
    pool: SqlitePool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application, reusing `pool` instead of connecting when one is given.
    ///
    /// Migrations run against whichever pool ends up being used.
    pub async fn new_with_pool(config: Config, pool: Option<SqlitePool>) -> anyhow::Result<Self> {
        debug!("Starting empresas with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
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
            "empresas listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        // Close database connections
        info!("Closing database connections...");
        self.pool.close().await;

        // Shutdown telemetry
        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::CorsConfig;
    use crate::test_utils::*;
    use axum::http::StatusCode;

    #[test_log::test(tokio::test)]
    async fn test_healthz_endpoint() {
        let pool = create_test_pool().await;
        let app = create_test_app(pool).await;

        let response = app.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[test_log::test(tokio::test)]
    async fn test_openapi_document_is_served() {
        let pool = create_test_pool().await;
        let app = create_test_app(pool).await;

        let response = app.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let doc: serde_json::Value = response.json();
        assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
        assert!(doc["paths"]["/api/empresas/{empresaId}/socios/{id}"]["put"].is_object());

        app.get("/docs").await.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_docs_can_be_disabled() {
        let pool = create_test_pool().await;
        let mut config = create_test_config();
        config.enable_docs = false;
        let app = Application::new_with_pool(config, Some(pool)).await.unwrap().into_test_server();

        app.get("/api-docs/openapi.json").await.assert_status_not_found();
        app.get("/docs").await.assert_status_not_found();
        app.get("/api/empresas").await.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_router_serves_requests_without_a_listener() {
        use axum::body::Body;
        use tower::ServiceExt;

        let pool = create_test_pool().await;
        let state = AppState::builder().db(pool).config(create_test_config()).build();
        let router = build_router(state).unwrap();

        let request = http::Request::builder().uri("/api/empresas").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }

    #[test_log::test(tokio::test)]
    async fn test_metrics_endpoint_only_when_enabled() {
        let pool = create_test_pool().await;
        let app = create_test_app(pool).await;
        app.get("/internal/metrics").await.assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn test_cors_preflight_allows_configured_origin() {
        let pool = create_test_pool().await;
        let mut config = create_test_config();
        config.cors = CorsConfig {
            allowed_origins: vec![CorsOrigin::Url("https://app.example.com".parse().unwrap())],
            allow_credentials: true,
            max_age: Some(600),
        };
        let app = Application::new_with_pool(config, Some(pool)).await.unwrap().into_test_server();

        let response = app
            .method(Method::OPTIONS, "/api/empresas")
            .add_header("origin", "https://app.example.com")
            .add_header("access-control-request-method", "POST")
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.header("access-control-allow-origin"),
            HeaderValue::from_static("https://app.example.com")
        );
        assert_eq!(response.header("access-control-allow-credentials"), HeaderValue::from_static("true"));
    }

    #[test_log::test(tokio::test)]
    async fn test_default_cors_allows_any_origin() {
        let pool = create_test_pool().await;
        let app = create_test_app(pool).await;

        let response = app.get("/api/empresas").add_header("origin", "https://anywhere.example").await;
        response.assert_status_ok();
        assert_eq!(response.header("access-control-allow-origin"), HeaderValue::from_static("*"));
    }

    #[test_log::test(tokio::test)]
    async fn test_application_connects_to_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = create_test_config();
        config.database = config::DatabaseConfig::Embedded {
            data_dir: Some(dir.path().to_path_buf()),
            persistent: true,
            pool: config::PoolSettings::default(),
        };

        let app = Application::new(config.clone()).await.unwrap().into_test_server();
        app.post("/api/empresas")
            .json(&serde_json::json!({"nome": "Acme"}))
            .await
            .assert_status(StatusCode::CREATED);

        // A second application over the same file sees the data
        let app = Application::new(config).await.unwrap().into_test_server();
        let companies: Vec<serde_json::Value> = app.get("/api/empresas").await.json();
        assert_eq!(companies.len(), 1);
    }
}
