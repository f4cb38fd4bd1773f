//! API error handling.

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use geocache_core::error::GeocacheError;

/// API error type.
///
/// Rendered as a bare text body. Provider and store failures all collapse
/// into the same generic 500 so callers cannot tell causes apart.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Internal server error.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }

    /// Returns the status code this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.message));
        *response.status_mut() = self.status;
        response
    }
}

impl From<GeocacheError> for ApiError {
    fn from(err: GeocacheError) -> Self {
        match &err {
            GeocacheError::Validation(message) => ApiError::bad_request(message.clone()),
            _ => {
                tracing::error!(error = %err, "Unhandled geocoding failure");
                ApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(GeocacheError::Validation("Missing 'address' query parameter".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let response = err.into_response();
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_collaborator_errors_are_indistinguishable() {
        let upstream = ApiError::from(GeocacheError::upstream_status(403));
        let store = ApiError::from(GeocacheError::Store("timeout".into()));

        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.status(), store.status());
        assert_eq!(upstream.message, store.message);
    }
}
