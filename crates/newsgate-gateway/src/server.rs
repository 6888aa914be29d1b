//! Axum-based HTTP gateway server.
//!
//! [`GatewayServer`] wires the error sink, the reqwest upstream client and
//! the fan-out coordinator into a running axum service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/add-comment` | Validated comment submission (three checks, then one write). |
//! | `GET`  | `/news+comments` | News item and its thread, fetched concurrently. |
//! | `GET`  | `/newsList` | One page of headlines from the content store. |
//! | `GET`  | `/news` | A single news item. |
//! | `GET`  | `/comment` | The comment thread of a news item. |
//! | `GET`  | `/health` | Liveness check, always `200 OK`. |
//!
//! Every response carries the request's `X-Request-Id`.

use crate::backend::HttpUpstream;
use crate::config::GatewayConfig;
use crate::error::StartupError;
use crate::handlers::{comments_router, health_router, news_router};
use crate::middleware::track_correlation;
use crate::sink::ErrorSink;
use crate::state::AppState;
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the full axum [`Router`] over `state`.
///
/// Exposed separately from [`GatewayServer::start`] so tests can drive it
/// with `tower::ServiceExt::oneshot` against any upstream client.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(comments_router())
        .merge(news_router())
        .merge(health_router())
        .layer(middleware::from_fn(track_correlation))
        .with_state(Arc::new(state))
}

/// High-level gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server from the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Bind to `0.0.0.0:{port}` and serve until Ctrl+C or SIGTERM, then
    /// drain the error sink.
    pub async fn start(self) -> Result<(), StartupError> {
        let config = self.config;
        let (sink, sink_worker) = ErrorSink::spawn(config.error_sink);
        let upstream = HttpUpstream::new(config.upstreams.clone(), config.upstream_timeout)?;
        let state = AppState::new(Arc::new(upstream), sink.clone(), config.upstream_timeout);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        info!(
            addr = %addr,
            news = %config.upstreams.news,
            comments = %config.upstreams.comments,
            verification = %config.upstreams.verification,
            upstream_timeout_ms = u64::try_from(config.upstream_timeout.as_millis()).unwrap_or(u64::MAX),
            "newsgate starting"
        );
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let served = axum::serve(
            listener,
            router(state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        let dropped = sink.dropped();
        drop(sink);
        let processed = sink_worker.drain().await;
        info!(processed, dropped, "error sink drained, newsgate stopped");

        served.map_err(StartupError::from)
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
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
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
