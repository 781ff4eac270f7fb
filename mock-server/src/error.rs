use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures rendered as `{ "success": false, "message": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),
}

impl MockError {
    pub fn status(&self) -> StatusCode {
        match self {
            MockError::BadRequest(_) => StatusCode::BAD_REQUEST,
            MockError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            MockError::Forbidden(_) => StatusCode::FORBIDDEN,
            MockError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<MultipartError> for MockError {
    fn from(err: MultipartError) -> Self {
        MockError::BadRequest(err.body_text())
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status(), message = %self, "request rejected");
        (
            self.status(),
            Json(json!({ "success": false, "message": self.to_string() })),
        )
            .into_response()
    }
}
