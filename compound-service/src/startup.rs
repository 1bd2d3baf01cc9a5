//! Application startup and lifecycle management.

use crate::config::CompoundConfig;
use crate::handlers::{generate_compound, health_check, metrics, not_found};
use crate::middleware::metrics_middleware;
use crate::services::providers::openai::{OpenAiConfig, OpenAiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::CompoundService;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: CompoundConfig,
    pub compound_service: CompoundService,
}

impl AppState {
    pub fn new(config: CompoundConfig, provider: Arc<dyn TextProvider>) -> Self {
        let compound_service = CompoundService::new(provider, config.openai.model.clone());
        Self {
            config,
            compound_service,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/api/compound", post(generate_compound))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the OpenAI provider from `config`.
    pub async fn build(config: CompoundConfig) -> Result<Self, AppError> {
        let provider: Arc<dyn TextProvider> = Arc::new(OpenAiTextProvider::new(OpenAiConfig {
            api_key: config.openai.api_key.clone(),
            base_url: config.openai.base_url.clone(),
        }));

        tracing::info!(
            model = %config.openai.model,
            base_url = %config.openai.base_url,
            "Initialized OpenAI text provider"
        );

        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: CompoundConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 binds a random port for testing
        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Compound service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, provider),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}
