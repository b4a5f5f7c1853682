use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowbridge_core::error::CoreError;
use serde_json::json;

use crate::relay::RelayError;
use crate::site_api::SiteApiError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds relay and upstream
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `flowbridge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The submission could not be relayed to the executor.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// A failed call to the site API.
    #[error(transparent)]
    Upstream(#[from] SiteApiError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// A request body that failed JSON extraction (malformed JSON, unknown
/// operation type, wrong content type).
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            AppError::Relay(relay) => match relay {
                RelayError::NoPeerAvailable => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NO_PEER",
                    relay.to_string(),
                ),
                RelayError::PeerDisconnected => (
                    StatusCode::BAD_GATEWAY,
                    "PEER_DISCONNECTED",
                    relay.to_string(),
                ),
                RelayError::Encode(e) => internal(&e.to_string()),
            },

            AppError::Upstream(upstream) => match upstream {
                SiteApiError::NotConfigured(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NOT_CONFIGURED",
                    upstream.to_string(),
                ),
                SiteApiError::MissingToken => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    upstream.to_string(),
                ),
                SiteApiError::Request(_) | SiteApiError::Status { .. } => {
                    tracing::warn!(error = %upstream, "Upstream error");
                    (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", upstream.to_string())
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal(msg: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %msg, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
