//! HTTP API.
//!
//! Axum-based endpoints that fetch a player's games, compute their profile
//! and return it as an HTML page or JSON.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::dispatch::DispatchError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Upstream timeout: {0}")]
    GatewayTimeout(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "BAD_GATEWAY"),
            ApiError::GatewayTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "GATEWAY_TIMEOUT"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        use crate::sources::SourceError;

        match err {
            DispatchError::UnknownSite(_) => ApiError::NotFound(err.to_string()),
            DispatchError::Source(SourceError::InvalidUser(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            DispatchError::Source(_) => {
                warn!("{}", err);
                ApiError::BadGateway(err.to_string())
            }
            DispatchError::Timeout(_) => {
                warn!("{}", err);
                ApiError::GatewayTimeout(err.to_string())
            }
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = match state.cors_origin.as_str() {
        "*" => CorsLayer::new().allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => CorsLayer::new().allow_origin(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                CorsLayer::new()
            }
        },
    };

    Router::new()
        .route("/", get(routes::profile::profile_page))
        .route("/profile", get(routes::profile::profile_page))
        .route("/api/profile", get(routes::profile::profile_json))
        .route("/api/sites", get(routes::health::list_sites))
        .route("/health", get(routes::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fetch::FetchError;
    use crate::sources::SourceError;

    #[test]
    fn test_dispatch_error_mapping() {
        let err: ApiError = DispatchError::UnknownSite("chess.com".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError =
            DispatchError::Source(SourceError::InvalidUser("a/b".to_string())).into();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err: ApiError = DispatchError::Source(SourceError::Fetch(FetchError::HttpStatus {
            status: 500,
            message: "Internal Server Error".to_string(),
        }))
        .into();
        assert!(matches!(err, ApiError::BadGateway(_)));

        let err: ApiError = DispatchError::Timeout(Duration::from_secs(90)).into();
        assert!(matches!(err, ApiError::GatewayTimeout(_)));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::BadGateway("x".into()), StatusCode::BAD_GATEWAY),
            (ApiError::GatewayTimeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
