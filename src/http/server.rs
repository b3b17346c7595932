//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, timeouts, request ID, metrics)
//! - Inject the shared store into handlers
//! - Serve until the shutdown signal fires

use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::StoreConfig;
use crate::http::handlers::{
    create_config, delete_config, get_config, get_status, list_configs, search_configs,
    update_config,
};
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::observability::metrics;
use crate::store::ConfigStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
}

/// HTTP front end of the config store.
pub struct HttpServer {
    router: Router,
    config: StoreConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `store`.
    pub fn new(config: StoreConfig, store: Arc<ConfigStore>) -> Self {
        let state = AppState { store };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &StoreConfig, state: AppState) -> Router {
        Router::new()
            .route("/configs", get(list_configs).post(create_config))
            .route(
                "/configs/{name}",
                get(get_config)
                    .put(update_config)
                    .patch(update_config)
                    .delete(delete_config),
            )
            .route("/search", get(search_configs))
            .route("/status", get(get_status))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Router with all layers applied, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
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
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
