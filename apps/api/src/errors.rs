use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::sections::SectionError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::NotFound(format!("Resume {id} not found")),
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Unavailable(msg) => AppError::Store(msg),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Llm(e.to_string())
    }
}

impl From<SectionError> for AppError {
    fn from(e: SectionError) -> Self {
        match e {
            SectionError::Store(e) => e.into(),
            SectionError::Generation(e) => e.into(),
            SectionError::Encode(e) => AppError::Internal(e.into()),
            SectionError::GenerationInFlight { .. }
            | SectionError::SaveBlocked
            | SectionError::Busy
            | SectionError::Unmounted => AppError::Conflict(e.to_string()),
            SectionError::UnknownSection(_) => AppError::NotFound(e.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Sign in to manage resumes".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "Text generation failed, please try again".to_string(),
                )
            }
            AppError::Store(msg) => {
                tracing::error!("Store error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_ERROR",
                    "The resume could not be saved".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::sections::Violation;

    #[rstest]
    #[case(AppError::NotFound("x".into()), StatusCode::NOT_FOUND)]
    #[case(AppError::Validation("x".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::Conflict("x".into()), StatusCode::CONFLICT)]
    #[case(AppError::Unauthorized, StatusCode::UNAUTHORIZED)]
    #[case(AppError::Llm("x".into()), StatusCode::BAD_GATEWAY)]
    #[case(AppError::Store("x".into()), StatusCode::SERVICE_UNAVAILABLE)]
    fn test_status_codes(#[case] error: AppError, #[case] status: StatusCode) {
        assert_eq!(error.into_response().status(), status);
    }

    #[rstest]
    #[case(SectionError::LastEntry { noun: "skill" }, "VALIDATION_ERROR")]
    #[case(SectionError::Validation(Violation { index: Some(0), field: "title" }), "VALIDATION_ERROR")]
    #[case(SectionError::SaveBlocked, "CONFLICT")]
    #[case(SectionError::UnknownSection("awards".into()), "NOT_FOUND")]
    #[case(SectionError::Store(StoreError::NotFound(Uuid::nil())), "NOT_FOUND")]
    #[case(SectionError::Generation(LlmError::EmptyContent), "LLM_ERROR")]
    fn test_section_errors_map_to_codes(#[case] error: SectionError, #[case] code: &str) {
        let app: AppError = error.into();
        let expected = match app {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Llm(_) => "LLM_ERROR",
            _ => "OTHER",
        };
        assert_eq!(expected, code);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::Validation("Entry 1: title is required".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Entry 1: title is required");
    }
}
