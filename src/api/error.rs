use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::any::Any;
use std::fmt;
use std::time::Duration;

use super::ErrorBody;
use crate::services::SearchError;

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    Throttled { retry_after: Duration },

    NoProviders,

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Throttled { retry_after } => {
                write!(f, "Rate limit exceeded, retry in {}s", retry_seconds(*retry_after))
            }
            ApiError::NoProviders => write!(f, "No movie providers are configured"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "INVALID_QUERY",
            ApiError::Throttled { .. } => "RATE_LIMITED",
            ApiError::NoProviders => "NO_PROVIDERS",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Throttled { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests. Please try again later.".to_string(),
            ),
            ApiError::NoProviders => {
                tracing::error!("Search requested with no providers configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "No movie API providers are configured".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            detail,
            error_code: self.error_code(),
        };
        let mut response = (status, Json(body)).into_response();

        if let ApiError::Throttled { retry_after } = self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_seconds(retry_after)),
            );
        }

        response
    }
}

/// Whole seconds, rounded up so clients never retry early.
fn retry_seconds(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs();
    if retry_after.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidQuery(e) => ApiError::ValidationError(e.to_string()),
            SearchError::NoProvidersConfigured => ApiError::NoProviders,
        }
    }
}

/// Turns a handler panic into a generic 500 and logs the payload.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "unknown panic payload".to_string());

    ApiError::internal(format!("Handler panicked: {message}")).into_response()
}
