//! Diagnostic-mode error detail.
//!
//! Installed only when `APP_ENV=development`. Responses that carry an
//! [`InternalDetail`] extension are re-rendered with the detail in the
//! `error` field; every other response passes through untouched.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{ErrorBody, InternalDetail, INTERNAL_MESSAGE};

pub async fn attach_error_detail(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(InternalDetail(detail)) = response.extensions().get::<InternalDetail>().cloned()
    else {
        return response;
    };

    let body = ErrorBody {
        message: INTERNAL_MESSAGE.to_string(),
        code: "INTERNAL_ERROR",
        errors: None,
        error: Some(detail),
    };
    (response.status(), Json(body)).into_response()
}
