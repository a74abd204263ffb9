/// Error types for social-api
///
/// Every variant maps to an HTTP status through `ResponseError`. Error bodies always
/// carry a `message` field.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for social-api operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed request field
    #[error("{0}")]
    Validation(String),

    /// Request is well formed but not applicable to the current state
    #[error("{0}")]
    InvalidRequest(String),

    /// Duplicate resource or edge
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Bad credentials or bad token
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Reports any failure as a 400, keeping the message.
    ///
    /// The like toggle endpoint answers every failure this way.
    pub fn into_bad_request(self) -> Self {
        match self {
            AppError::Database(_) | AppError::Internal(_) => {
                AppError::InvalidRequest(self.to_string())
            }
            AppError::Validation(msg)
            | AppError::InvalidRequest(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => AppError::InvalidRequest(msg),
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Internal(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidRequest(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, "request failed");

            let body = if cfg!(debug_assertions) {
                serde_json::json!({ "message": "Server error", "error": self.to_string() })
            } else {
                serde_json::json!({ "message": "Server error" })
            };
            return HttpResponse::build(status).json(body);
        }

        HttpResponse::build(status).json(serde_json::json!({ "message": self.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::Internal(format!("Password hashing failed: {}", err))
    }
}
