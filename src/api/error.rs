//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                      | Key Methods         |
// |-----------------|--------------------------------------------------|---------------------|
// | ApiError        | Transport-level error taxonomy                   | from, into_response |
//--------------------------------------------------------------------------------------------------

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::domain::services::OrderServiceError;
use crate::outbounds::repository::RepositoryError;

use super::dto::MappingError;

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// Error taxonomy surfaced to remote callers.
///
/// Handlers never recover or mask errors; everything from translation or
/// the service layer arrives here unmodified in kind and is mapped to a
/// remote-call failure.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The referenced order does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request payload was malformed or invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Admission control rejected the call; the caller should back off
    /// and retry later.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The storage backend could not be reached; transient.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A storage constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An internal server error occurred.
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate limit exceeded".to_string(),
            ),
            Self::StorageUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}")),
        };

        let body = Json(json!({
            "error": {
                "message": message,
                "code": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id } => Self::NotFound(format!("order {id} not found")),
            RepositoryError::Conflict { .. } => Self::Conflict(err.to_string()),
            RepositoryError::Unavailable { .. } => Self::StorageUnavailable(err.to_string()),
            RepositoryError::Backend { .. } => Self::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<OrderServiceError> for ApiError {
    fn from(err: OrderServiceError) -> Self {
        match err {
            OrderServiceError::Storage(inner) => inner.into(),
        }
    }
}

impl From<MappingError> for ApiError {
    fn from(err: MappingError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_maps_to_404() {
        let api_err = ApiError::from(RepositoryError::NotFound { id: 5 });
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }

    #[test]
    fn storage_unavailable_maps_to_503() {
        let api_err = ApiError::from(RepositoryError::Unavailable {
            operation: "find_all",
            source: anyhow::anyhow!("connection refused"),
        });
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn mapping_error_maps_to_400() {
        let api_err = ApiError::from(MappingError::MissingField("id"));
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
