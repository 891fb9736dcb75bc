use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ApiResponse;

/// Everything a handler can fail with. Each variant maps to one HTTP status
/// and is rendered through the uniform envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access denied")]
    Forbidden,

    #[error("User not found with id: {0}")]
    UserNotFound(i64),

    #[error("User not found with email: {0}")]
    UserNotFoundByEmail(String),

    #[error("Payment not found with id: {0}")]
    PaymentNotFound(i64),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("An error occurred: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from_db(anyhow::Error::new(err))
    }
}

impl ApiError {
    /// Fold a storage error, translating a unique-constraint violation into
    /// the duplicate-email conflict. The only unique constraint in the
    /// schema is users.email, so two racing creates with the same address
    /// both come back as 409 rather than the loser surfacing as a 500.
    pub fn from_db(err: anyhow::Error) -> Self {
        match err.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                ApiError::DuplicateEmail
            }
            _ => ApiError::Unexpected(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::UserNotFound(_)
            | ApiError::UserNotFoundByEmail(_)
            | ApiError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "request rejected");
        }

        let body = match self {
            ApiError::Validation(fields) => ApiResponse::error_with(
                "Validation failed",
                serde_json::to_value(fields).unwrap_or_default(),
            ),
            other => ApiResponse::error(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::UserNotFound(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::PaymentNotFound(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Validation(BTreeMap::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unexpected(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl std::fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "fake database error")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            if self.unique {
                sqlx::error::ErrorKind::UniqueViolation
            } else {
                sqlx::error::ErrorKind::Other
            }
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_folds_into_duplicate_email() {
        let db_err = sqlx::Error::Database(Box::new(FakeDbError { unique: true }));
        let err = ApiError::from_db(anyhow::Error::new(db_err));
        assert!(matches!(err, ApiError::DuplicateEmail));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let db_err = sqlx::Error::Database(Box::new(FakeDbError { unique: false }));
        let err = ApiError::from_db(anyhow::Error::new(db_err));
        assert!(matches!(err, ApiError::Unexpected(_)));

        let err = ApiError::from_db(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, ApiError::Unexpected(_)));
    }

    #[test]
    fn messages_name_the_missing_resource() {
        assert_eq!(
            ApiError::UserNotFoundByEmail("a@x.com".into()).to_string(),
            "User not found with email: a@x.com"
        );
        assert_eq!(
            ApiError::PaymentNotFound(3).to_string(),
            "Payment not found with id: 3"
        );
        assert_eq!(
            ApiError::Unexpected(anyhow::anyhow!("boom")).to_string(),
            "An error occurred: boom"
        );
    }
}
