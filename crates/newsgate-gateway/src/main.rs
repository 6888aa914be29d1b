//! newsgate edge gateway: entry point.
//!
//! Reads configuration from environment variables (see
//! [`newsgate_gateway::config`]) and starts the axum-based HTTP service.

use newsgate_gateway::config::{GatewayConfig, LogFormat};
use newsgate_gateway::server::GatewayServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("newsgate configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Initialise structured logging.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("newsgate_gateway=info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    info!(
        port = config.port,
        log_format = ?config.log_format,
        sink_capacity = config.error_sink.capacity,
        sink_policy = ?config.error_sink.policy,
        "newsgate configuration loaded"
    );

    if let Err(e) = GatewayServer::new(config).start().await {
        eprintln!("newsgate error: {e}");
        std::process::exit(1);
    }
}
