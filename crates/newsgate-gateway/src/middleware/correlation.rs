//! Correlation id tracking.
//!
//! Every inbound request gets exactly one [`CorrelationId`]:
//!
//! 1. taken from the `request_id` query parameter, else
//! 2. taken from the `X-Request-Id` header, else
//! 3. freshly generated.
//!
//! The id is stored in the request extensions (handlers read it through the
//! [`RequestCorrelation`] extractor), attached to the request span, forwarded
//! to every upstream call, and echoed back in the `X-Request-Id` response
//! header.

use axum::{
    extract::{ConnectInfo, FromRequestParts, Query, Request},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use newsgate_kernel::CorrelationId;
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{Instrument, info, info_span};

/// Header carrying the correlation id, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Query parameter carrying the correlation id, inbound and upstream.
pub const REQUEST_ID_PARAM: &str = "request_id";

#[derive(Debug, Deserialize)]
struct RequestIdQuery {
    request_id: Option<String>,
}

fn caller_supplied(req: &Request) -> Option<String> {
    let from_query = Query::<RequestIdQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(q)| q.request_id)
        .filter(|id| !id.trim().is_empty());
    from_query.or_else(|| {
        req.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    })
}

/// `axum::middleware::from_fn` entry point.
pub async fn track_correlation(mut req: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_caller_or_generate(caller_supplied(&req).as_deref());
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());

    let span = info_span!(
        "http_request",
        request_id = %correlation_id,
        method = %req.method(),
        uri = %req.uri(),
    );
    req.extensions_mut().insert(correlation_id.clone());

    let started = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            client = client.as_deref().unwrap_or("unknown"),
            "request completed"
        );
    });

    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Extractor for the request's correlation id.
///
/// Outside of [`track_correlation`] (unit tests mounting a bare handler) a
/// fresh id is generated.
#[derive(Debug, Clone)]
pub struct RequestCorrelation(pub CorrelationId);

impl<S> FromRequestParts<S> for RequestCorrelation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_else(CorrelationId::generate);
        Ok(RequestCorrelation(id))
    }
}
