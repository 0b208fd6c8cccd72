//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (header snapshot, request ID, tracing, timeout, body limit, metrics)
//! - Bind server to listener
//! - Serve until the shutdown broadcast fires

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, IntegrationConfig};
use crate::diagnostics::Diagnostics;
use crate::http::handlers;
use crate::http::request::{request_id, snapshot_headers, track_metrics, MakeRequestUuid};
use crate::render::HtmlRenderer;
use crate::store::LogStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LogStore>,
    pub renderer: Arc<HtmlRenderer>,
    pub diagnostics: Arc<Diagnostics>,
    pub integration: Arc<IntegrationConfig>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            store: Arc::new(LogStore::new(&config.storage)),
            renderer: Arc::new(HtmlRenderer::new(&config.render)),
            diagnostics: Arc::new(Diagnostics::new(&config.diagnostics, &config.integration)),
            integration: Arc::new(config.integration.clone()),
        }
    }
}

/// HTTP server for the request log.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// The fully layered router, for driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            log_dir = %self.config.storage.log_dir.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &AppConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/shops", get(handlers::list_shops))
        .route(
            "/shop/",
            post(handlers::append_without_shop).delete(handlers::delete_without_shop),
        )
        .route(
            "/shop/{shop_id}",
            post(handlers::append_log).delete(handlers::delete_log),
        )
        .route("/shop/{shop_id}/logs", get(handlers::view_logs))
        .route("/shop/{shop_id}/logs.json", get(handlers::view_logs_json))
        .route("/shop/{shop_id}/externalError", post(handlers::forced_error))
        .route(
            "/shop/{shop_id}/slow",
            get(handlers::slow_response).post(handlers::slow_response),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.limits.max_body_size))
        .layer(middleware::from_fn(track_metrics))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.limits.request_timeout_secs,
        )))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(middleware::from_fn(snapshot_headers))
}
