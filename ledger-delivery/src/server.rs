//! Router assembly and HTTP server with graceful shutdown

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

use crate::{
    config::Config,
    error::Result,
    guard::LifecycleGuard,
    handlers, health,
    middleware::{request_id_layer, request_id_propagation_layer, sensitive_headers_layer},
    state::AppState,
};

/// Prefix of every ledger route
pub const API_PREFIX: &str = "/api/v1";

/// Ledger routes behind the lifecycle guard
///
/// The guard wraps every route; the body limit sits outside it so oversized
/// bodies are rejected before a handler task is spawned.
pub fn router(state: AppState) -> Router {
    let guard = LifecycleGuard::from_config(state.config());
    let body_limit = state.config().body_limit_bytes();

    let api = Router::new()
        .route("/health", get(health::health))
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route("/accounts/{code}", get(handlers::get_account))
        .route("/accounts/{code}/entries", get(handlers::account_entries))
        .route(
            "/journals",
            get(handlers::list_journals).post(handlers::post_journal),
        )
        .route("/journals/{seq}", get(handlers::get_journal))
        .route("/trial-balance", get(handlers::trial_balance));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn_with_state(
            guard,
            LifecycleGuard::middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the server with the given router
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));

        tracing::info!("Starting {} on {}", self.config.service.name, addr);
        self.log_middleware_config();

        // Layers are applied in reverse order (bottom layer is outermost)
        let app = app
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer());

        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn log_middleware_config(&self) {
        tracing::info!("Middleware configuration:");
        tracing::info!(
            "  - Lifecycle guard: {} seconds per request",
            self.config.service.timeout_secs
        );
        tracing::info!("  - Request ID tracking: enabled");
        tracing::info!("  - Sensitive header masking: enabled");
        tracing::info!(
            "  - Request body limit: {} MB",
            self.config.middleware.body_limit_mb
        );
        tracing::info!(
            "  - Page size: default {}, max {}",
            self.config.pagination.default_limit,
            self.config.pagination.max_limit
        );
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}
