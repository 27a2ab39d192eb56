//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use heliohub_domain::error::HubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`HubError`] to an HTTP response with appropriate status code.
pub struct ApiError(HubError);

impl From<HubError> for ApiError {
    fn from(err: HubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            HubError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            HubError::Unsupported(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            HubError::Command(_) => {
                tracing::warn!(error = %self.0, "command failed");
                (StatusCode::BAD_GATEWAY, self.0.to_string())
            }
            HubError::Connect(_) | HubError::Transport(_) => {
                tracing::error!(error = %self.0, "gateway unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
