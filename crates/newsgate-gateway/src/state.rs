//! Shared application state for the gateway server

use crate::fanout::FanOutCoordinator;
use crate::sink::ErrorSink;
use newsgate_kernel::UpstreamClient;
use std::sync::Arc;
use std::time::Duration;

/// State shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Dispatches every upstream call, single or fanned out
    pub coordinator: FanOutCoordinator,
    /// Receives failures detected by the handlers themselves
    pub sink: ErrorSink,
}

impl AppState {
    /// Create a new `AppState` over `client`, with `call_timeout` as the
    /// deadline of every upstream call.
    pub fn new(client: Arc<dyn UpstreamClient>, sink: ErrorSink, call_timeout: Duration) -> Self {
        Self {
            coordinator: FanOutCoordinator::new(client, sink.clone(), call_timeout),
            sink,
        }
    }
}
