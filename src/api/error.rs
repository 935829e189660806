use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AnulacionError, EmisionError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<EmisionError> for ApiError {
    fn from(err: EmisionError) -> Self {
        match err {
            EmisionError::ClienteInvalido(_) => ApiError::NotFound(err.to_string()),
            EmisionError::TipoInvalido | EmisionError::DocumentoVacio => {
                ApiError::ValidationError(err.to_string())
            }
            EmisionError::NumeroEnConflicto(_) => ApiError::Conflict(err.to_string()),
            EmisionError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<AnulacionError> for ApiError {
    fn from(err: AnulacionError) -> Self {
        match err {
            AnulacionError::DocumentoInvalido(_) => ApiError::NotFound(err.to_string()),
            AnulacionError::MotivoRequerido => ApiError::ValidationError(err.to_string()),
            AnulacionError::YaAnulado { .. } => ApiError::Conflict(err.to_string()),
            AnulacionError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn cliente_not_found(id: i32) -> Self {
        ApiError::NotFound(format!("Cliente {} no encontrado", id))
    }

    pub fn producto_not_found(id: i32) -> Self {
        ApiError::NotFound(format!("Producto {} no encontrado", id))
    }

    pub fn documento_not_found(id: i32) -> Self {
        ApiError::NotFound(format!("Documento {} no encontrado", id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
