// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Taxonomia de erros compartilhada por todas as operações.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    NotFound,
    Unauthorized,
    TooManyRequests,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid or missing authentication token")]
    InvalidToken,

    #[error("Too many requests, please try again later")]
    TooManyRequests,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Object storage error: {0}")]
    StorageError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::InvalidToken => ErrorKind::Unauthorized,
            AppError::TooManyRequests => ErrorKind::TooManyRequests,
            AppError::DatabaseError(_)
            | AppError::StorageError(_)
            | AppError::CacheError(_)
            | AppError::InternalServerError(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Campo -> mensagens, ordenado por campo para respostas estáveis.
/// Violações de nível de struct (schema) ficam em `__all__`.
pub fn violation_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid ({})", e.code))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::ValidationError(errors) => {
                let details = violation_messages(errors);
                let summary = details
                    .values()
                    .flatten()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                json!({
                    "success": false,
                    "error": summary,
                    "details": details,
                })
            }
            e if e.kind() == ErrorKind::Internal => {
                // Método e URI vêm do span do TraceLayer (nível INFO, ver routes.rs).
                tracing::error!(error = ?e, "Erro Interno do Servidor");
                json!({ "success": false, "error": "Internal Server Error" })
            }
            e => json!({ "success": false, "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn validation_errors() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let mut name = ValidationError::new("required");
        name.message = Some("Name is required".into());
        errors.add("name", name);
        let mut phone = ValidationError::new("regex");
        phone.message = Some("Phone number must be in format +91-XXXXXXXXXX".into());
        errors.add("phoneNumber", phone);
        errors
    }

    #[test]
    fn kinds_map_to_http_statuses() {
        assert_eq!(AppError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::TooManyRequests.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::StorageError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_are_invalid_input() {
        let err = AppError::ValidationError(validation_errors());
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn violation_messages_keep_every_field() {
        let details = violation_messages(&validation_errors());
        assert_eq!(details.len(), 2);
        assert_eq!(details["name"], vec!["Name is required".to_string()]);
        assert_eq!(
            details["phoneNumber"],
            vec!["Phone number must be in format +91-XXXXXXXXXX".to_string()]
        );
    }

    #[test]
    fn internal_error_display_keeps_context_for_logs() {
        let err = AppError::StorageError("bucket unreachable".into());
        assert_eq!(err.to_string(), "Object storage error: bucket unreachable");
    }
}
