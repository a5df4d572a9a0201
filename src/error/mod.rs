//! Unified error handling for CardWizz Auth

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
///
/// `StoreUnavailable`, `Store` and `Conflict` are reported by the document
/// store and travel to the caller untranslated.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error originated in the document store.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            AppError::StoreUnavailable(_) | AppError::Store(_) | AppError::Conflict(_)
        )
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg.clone())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "The user store is temporarily unavailable".to_string(),
                )
            }
            AppError::Store(msg) => {
                tracing::error!("Store error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "store_error",
                    "The user store rejected the request".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::StoreUnavailable(err.to_string()),
            sqlx::Error::Database(ref db_err) => {
                if db_err.is_unique_violation() {
                    AppError::Conflict(db_err.message().to_string())
                } else if db_err.code().as_deref() == Some("28000") {
                    // access denied
                    AppError::StoreUnavailable(db_err.message().to_string())
                } else {
                    AppError::Store(err.to_string())
                }
            }
            other => AppError::Store(other.to_string()),
        }
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_error_display() {
        let err = AppError::StoreUnavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
    }

    #[test]
    fn test_error_conversion() {
        let err: AppError = anyhow::anyhow!("Something went wrong").into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_sqlx_pool_errors_are_unavailable() {
        assert!(matches!(
            AppError::from(sqlx::Error::PoolTimedOut),
            AppError::StoreUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(sqlx::Error::PoolClosed),
            AppError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn test_sqlx_io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            AppError::from(sqlx::Error::Io(io)),
            AppError::StoreUnavailable(_)
        ));
    }

    #[test]
    fn test_sqlx_row_not_found_is_store_error() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::Store(_)
        ));
    }

    #[rstest]
    #[case(AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Validation("x".into()), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(AppError::Conflict("x".into()), StatusCode::CONFLICT)]
    #[case(AppError::StoreUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(AppError::Store("x".into()), StatusCode::BAD_GATEWAY)]
    #[case(AppError::Internal(anyhow::anyhow!("x")), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_status_codes(#[case] err: AppError, #[case] expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }

    #[test]
    fn test_is_store_error() {
        assert!(AppError::Store("x".into()).is_store_error());
        assert!(AppError::Conflict("x".into()).is_store_error());
        assert!(!AppError::BadRequest("x".into()).is_store_error());
    }
}
