use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::axum_http::error_responses::AppError;

/// Fallback when no static site is configured.
pub async fn not_found(uri: Uri) -> Response {
    info!(path = %uri.path(), "http: no route matched");
    AppError::NotFound(format!("no route for {}", uri.path())).into_response()
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
