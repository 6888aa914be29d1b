//! Gateway error types

use crate::config::ConfigError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use newsgate_kernel::{Dependency, KernelError, StatusClass};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request-level failures surfaced to clients.
///
/// Clients only ever see the numeric code in the `Error` field; the text of
/// the variant goes to the error sink and the logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Rejected locally, no dependency was contacted.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] KernelError),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("{dependency} {operation} failed: {class}")]
    Upstream {
        class: StatusClass,
        dependency: Dependency,
        operation: &'static str,
    },
}

impl GatewayError {
    pub fn status_class(&self) -> StatusClass {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::MalformedBody(_) => {
                StatusClass::BadRequest
            }
            GatewayError::Upstream { class, .. } => *class,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        status_code(self.status_class())
    }

    /// Where the failure was detected, for error-sink reports.
    pub fn origin(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::MalformedBody(_) => "gateway",
            GatewayError::Upstream { dependency, .. } => dependency.as_str(),
        }
    }
}

/// Renders `{"Error": <code>}` with the matching HTTP status.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let error = self.status_class().http_status();
        (self.status_code(), Json(ErrorBody { error })).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

pub fn status_code(class: StatusClass) -> StatusCode {
    StatusCode::from_u16(class.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ErrorBody {
    #[serde(rename = "Error")]
    error: u16,
}

/// A body's own fields followed by the `Error` code, the shape the
/// single-item endpoints answer with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithError<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(rename = "Error", default)]
    pub error: u16,
}

impl<T: Default> WithError<T> {
    pub fn ok(body: T) -> Self {
        Self { body, error: 0 }
    }

    /// Zero-valued body carrying only the error code.
    pub fn failed(class: StatusClass) -> Self {
        Self {
            body: T::default(),
            error: class.http_status(),
        }
    }
}

/// Failures that prevent the gateway from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
