//! Typed errors and HTTP mapping.

use crate::validation::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Producto no encontrado";
const MALFORMED_BODY_MESSAGE: &str = "JSON no valido";
const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Cuerpo de la peticion demasiado grande";
const INTERNAL_MESSAGE: &str = "Error interno del servidor";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

/// Failures raised by a [`ProductStore`](crate::store::ProductStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl StoreError {
    /// Short cause reported by the readiness probe.
    pub fn reason(&self) -> &'static str {
        match self {
            StoreError::Db(sqlx::Error::PoolTimedOut) => "timeout",
            StoreError::Db(sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_)) => "unreachable",
            StoreError::Db(_) => "error",
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed on {} rule(s)", .0.len())]
    Validation(ValidationErrors),
    #[error("product not found: {0}")]
    NotFound(i32),
    #[error("malformed body: {0}")]
    MalformedBody(String),
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(errors) => {
                tracing::debug!(fields = ?errors.by_field(), "request rejected by validation");
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            AppError::NotFound(id) => {
                tracing::debug!(product_id = id, "product not found");
                (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
            }
            AppError::MalformedBody(reason) => {
                tracing::debug!(%reason, "malformed request body");
                (StatusCode::BAD_REQUEST, MALFORMED_BODY_MESSAGE)
            }
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, PAYLOAD_TOO_LARGE_MESSAGE),
            other @ (AppError::Store(_) | AppError::Config(_)) => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// `map_response` hook: any 413, including the plain-text one from the body
/// limit layer when `Content-Length` is over the limit, becomes the JSON error body.
pub async fn payload_too_large_as_json(response: Response) -> Response {
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge.into_response();
    }
    response
}
