use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    Validation(String),

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token already used")]
    TokenAlreadyUsed,

    #[error("Token expired")]
    TokenExpired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::TokenNotFound => StatusCode::NOT_FOUND,
            AppError::TokenAlreadyUsed | AppError::TokenExpired => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Token validation failures carry `valid: false` in the envelope so the
    /// redemption client can distinguish a rejected token from a transport
    /// error.
    fn valid_flag(&self) -> Option<bool> {
        match self {
            AppError::TokenNotFound | AppError::TokenAlreadyUsed | AppError::TokenExpired => {
                Some(false)
            }
            _ => None,
        }
    }
}

impl From<crate::validation::ValidationError> for AppError {
    fn from(err: crate::validation::ValidationError) -> Self {
        AppError::Validation(err.message)
    }
}

impl From<crate::domain::RedeemError> for AppError {
    fn from(err: crate::domain::RedeemError) -> Self {
        match err {
            crate::domain::RedeemError::AlreadyUsed => AppError::TokenAlreadyUsed,
            crate::domain::RedeemError::Expired => AppError::TokenExpired,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self.valid_flag() {
            Some(valid) => Json(json!({
                "error": self.to_string(),
                "valid": valid,
            })),
            None => Json(json!({
                "error": self.to_string(),
            })),
        };

        (status, body).into_response()
    }
}
