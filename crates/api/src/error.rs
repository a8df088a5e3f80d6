use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use vidcat_core::error::{CoreError, FieldError};

/// Client-facing message for every 500 response.
pub const INTERNAL_MESSAGE: &str = "Server error";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vidcat_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message. Never shown to clients
    /// outside diagnostic mode.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// JSON error body: `{ message, code, errors?, error? }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Internal failure detail; only populated in diagnostic mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Detail of an internal failure, carried in the response extensions so the
/// diagnostics layer can surface it.
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors = None;
        let mut detail = None;

        let (status, code, message) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                CoreError::InvalidInput(fields) => {
                    errors = Some(fields);
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Validation failed".to_string(),
                    )
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    detail = Some(msg);
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                detail = Some(msg);
                internal()
            }
        };

        let body = ErrorBody {
            message,
            code,
            errors,
            error: None,
        };

        let mut response = (status, axum::Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(InternalDetail(detail));
        }
        response
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}
