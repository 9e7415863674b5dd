//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use haulbook_core::record::RecordError;

/// API-level error that renders as a structured JSON payload.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body or form.
    BadRequest(String),
    /// A record operation failed.
    Record(RecordError),
}

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            // the historical wire contract reports a duplicate carrier as 400
            Self::Record(RecordError::Conflict(_)) => {
                (StatusCode::BAD_REQUEST, "duplicate_carrier")
            }
            Self::Record(RecordError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Record(RecordError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
            }
            Self::Record(RecordError::Persistence(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error")
            }
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Record(e) => e.to_string(),
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        Self::Record(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            error!(error = %message, "request failed");
        }

        (
            status,
            Json(json!({
                "error": code,
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let conflict = ApiError::from(RecordError::conflict("ABC"));
        assert_eq!(conflict.status_and_code().0, StatusCode::BAD_REQUEST);

        let not_found = ApiError::from(RecordError::not_found(Uuid::new_v4()));
        assert_eq!(not_found.status_and_code().0, StatusCode::NOT_FOUND);

        let persistence = ApiError::from(RecordError::persistence("db down"));
        assert_eq!(
            persistence.status_and_code().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let bad = ApiError::bad_request("invalid containersList");
        assert_eq!(bad.status_and_code().0, StatusCode::BAD_REQUEST);
    }
}
