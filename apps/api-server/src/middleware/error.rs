//! Error handling - every failure becomes a `{ message, error }` JSON body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use scribe_core::ports::{AuthError, StorageError};
use scribe_core::{DomainError, RepoError};
use scribe_shared::{ErrorCode, ErrorResponse};

/// Application-level error returned by handlers.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AppError(DomainError);

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()))
    }

    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self(DomainError::not_found(entity_type, key))
    }

    pub fn unauthorized() -> Self {
        Self(DomainError::Unauthorized)
    }

    pub fn code(&self) -> ErrorCode {
        match &self.0 {
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::Duplicate(_) => ErrorCode::Conflict,
            DomainError::InvalidCredentials => ErrorCode::InvalidCredentials,
            DomainError::Unauthorized => ErrorCode::Unauthorized,
            DomainError::Forbidden(_) => ErrorCode::Forbidden,
            DomainError::NotFound { .. } => ErrorCode::NotFound,
            DomainError::Storage(_) => ErrorCode::StorageError,
            DomainError::Internal(_) => ErrorCode::InternalError,
        }
    }

    fn client_message(&self) -> String {
        match &self.0 {
            DomainError::Validation(msg)
            | DomainError::Duplicate(msg)
            | DomainError::Forbidden(msg) => msg.clone(),
            DomainError::NotFound { entity_type, .. } => format!("{entity_type} not found"),
            DomainError::InvalidCredentials => "invalid email or password".to_string(),
            DomainError::Unauthorized => "unauthorized".to_string(),
            DomainError::Storage(detail) => {
                tracing::error!(%detail, "Storage failure");
                "storage failure".to_string()
            }
            DomainError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                "internal server error".to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Duplicate(_) => StatusCode::CONFLICT,
            DomainError::InvalidCredentials | DomainError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Storage(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ErrorResponse::new(self.code(), self.client_message()))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        Self(err.into())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Duplicate("x".into()), StatusCode::CONFLICT),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::not_found("post", 1), StatusCode::NOT_FOUND),
            (DomainError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[actix_rt::test]
    async fn test_internal_detail_is_hidden() {
        let body = body_of(AppError::from(RepoError::Query(
            "relation \"users\" does not exist".into(),
        )))
        .await;

        assert_eq!(body["error"], "storage_error");
        assert!(!body["message"].as_str().unwrap().contains("relation"));
    }

    #[actix_rt::test]
    async fn test_constraint_detail_is_hidden() {
        let fk = AppError::from(RepoError::ForeignKey(
            "insert or update on table \"comments\" violates foreign key constraint \"comments_post_id_fkey\""
                .into(),
        ));
        assert_eq!(fk.status_code(), StatusCode::NOT_FOUND);
        let body = body_of(fk).await;
        assert_eq!(body["error"], "not_found");
        assert!(!body.to_string().contains("comments_post_id_fkey"));

        let unique = AppError::from(RepoError::Duplicate(
            "duplicate key value violates unique constraint \"bookmarks_user_id_post_id_key\"".into(),
        ));
        assert_eq!(unique.status_code(), StatusCode::CONFLICT);
        let body = body_of(unique).await;
        assert_eq!(body["error"], "conflict");
        assert!(!body.to_string().contains("bookmarks_user_id_post_id_key"));
    }

    #[actix_rt::test]
    async fn test_token_errors_are_unauthorized() {
        let body = body_of(AppError::from(AuthError::SignatureMismatch)).await;
        assert_eq!(body["error"], "unauthorized");
    }
}
