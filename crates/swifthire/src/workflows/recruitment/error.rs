use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::repository::RepositoryError;

/// Failure surfaced by every recruitment operation. Messages are user-facing.
#[derive(Debug, thiserror::Error)]
pub enum RecruitmentError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RecruitmentError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RecruitmentError::NotFound(_) => StatusCode::NOT_FOUND,
            RecruitmentError::Unauthorized(_) => StatusCode::FORBIDDEN,
            RecruitmentError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RecruitmentError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            RecruitmentError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            RecruitmentError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RecruitmentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
