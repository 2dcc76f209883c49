use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{rules::ValidationError, submissions::store::StoreError};

/// Errors returned by the JSON endpoints, always as `{"error": <message>}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Submission already exists for this team/email")]
    Conflict,

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict => ApiError::Conflict,
            e => ApiError::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MalformedPayload
            | ApiError::Invalid(_)
            | ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::ApiError;
    use crate::{rules::ValidationError, submissions::store::StoreError};

    #[test]
    fn store_details_are_not_leaked() {
        let err = ApiError::from(StoreError::Migration("secret detail".into()));
        assert_eq!(err.to_string(), "Database error");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn conflict_and_validation_are_bad_requests() {
        let conflict = ApiError::from(StoreError::Conflict);
        assert!(matches!(conflict, ApiError::Conflict));
        assert_eq!(conflict.into_response().status(), StatusCode::BAD_REQUEST);

        let invalid = ApiError::from(ValidationError::BatchMismatch);
        assert_eq!(
            invalid.to_string(),
            "All team members must be from the same batch."
        );
    }
}
