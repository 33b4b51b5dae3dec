// src/common/response.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Envelope de sucesso: `{ "success": true, "message"?: "...", "data": ... }`.
/// Os erros usam a mesma flag `success`, ver `AppError::into_response`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}
