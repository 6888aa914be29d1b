//! `newsgate-gateway`: edge API gateway runtime.
//!
//! This crate provides the concrete implementations of the contracts defined
//! in `newsgate-kernel`:
//!
//! | Kernel contract | Implementation |
//! |----------------|----------------|
//! | [`UpstreamClient`](newsgate_kernel::UpstreamClient) | [`backend::HttpUpstream`] |
//!
//! On top of it sit the [`fanout::FanOutCoordinator`], the two composite
//! operations in [`compose`], the bounded [`sink::ErrorSink`], and the
//! correlation middleware. [`server::GatewayServer`] wires everything
//! together into an axum HTTP service.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use newsgate_gateway::config::GatewayConfig;
//! use newsgate_gateway::server::GatewayServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatewayConfig::from_env()?;
//!     GatewayServer::new(config).start().await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod compose;
pub mod config;
pub mod error;
pub mod fanout;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod sink;
pub mod state;

// Re-export the kernel types for convenience.
pub use newsgate_kernel as kernel;
