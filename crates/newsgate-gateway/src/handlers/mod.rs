//! Request handlers for the gateway API

pub mod comments;
pub mod health;
pub mod news;
mod params;

pub use comments::comments_router;
pub use health::health_router;
pub use news::news_router;

use crate::error::GatewayError;
use crate::sink::{ErrorReport, ErrorSink};
use newsgate_kernel::CorrelationId;

/// Report a failure detected by the gateway itself.
///
/// Upstream failures are already reported by the coordinator when the call
/// completes, so they are not reported a second time here.
pub(crate) async fn report_local(sink: &ErrorSink, correlation_id: &CorrelationId, err: &GatewayError) {
    if matches!(err, GatewayError::Upstream { .. }) {
        return;
    }
    sink.report(ErrorReport::new(correlation_id.clone(), err.origin(), err.to_string()))
        .await;
}

/// Serialize `body` with the HTTP status matching its `Error` code
/// (`0` is 200).
pub(crate) fn with_status<T: serde::Serialize>(error: u16, body: T) -> axum::response::Response {
    use axum::{Json, http::StatusCode, response::IntoResponse};
    let status = match error {
        0 => StatusCode::OK,
        code => StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    };
    (status, Json(body)).into_response()
}
