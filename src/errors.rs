use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::admission::Rejection;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("booking store error: {0:#}")]
    Store(#[from] anyhow::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Rejected(r) if r.is_malformed() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Rejected(_) => StatusCode::CONFLICT,
            AppError::Store(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        if let AppError::Store(e) = &self {
            tracing::error!(error = %format!("{e:#}"), "booking store call failed");
        }

        let body = match &self {
            AppError::Rejected(r) => {
                serde_json::json!({ "error": self.to_string(), "code": r.code() })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
