use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use wealthguard_core::WealthGuardError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Need at least two price points, got {0}")]
    InsufficientPrices(usize),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No advisor tokens left for {0}")]
    TokensExhausted(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),
}

impl From<WealthGuardError> for AppError {
    fn from(err: WealthGuardError) -> Self {
        match err {
            WealthGuardError::InsufficientPrices { got } => AppError::InsufficientPrices(got),
            WealthGuardError::UnknownUser(user) => AppError::UserNotFound(user),
            WealthGuardError::TokensExhausted(user) => AppError::TokensExhausted(user),
            WealthGuardError::UserExists(user) => {
                AppError::InvalidParam(format!("User already exists: {}", user))
            }
            WealthGuardError::InvalidParam(msg) => AppError::InvalidParam(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InsufficientPrices(got) => {
                tracing::warn!(got = %got, error_code = "INSUFFICIENT_PRICES", "Price history too short");
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_PRICES")
            }
            AppError::UserNotFound(user) => {
                tracing::info!(user = %user, error_code = "USER_NOT_FOUND", "User not found");
                (StatusCode::NOT_FOUND, "USER_NOT_FOUND")
            }
            AppError::TokensExhausted(user) => {
                tracing::info!(user = %user, error_code = "TOKENS_EXHAUSTED", "Advisor tokens exhausted");
                (StatusCode::PAYMENT_REQUIRED, "TOKENS_EXHAUSTED")
            }
            AppError::ExternalApi(msg) => {
                tracing::error!(message = %msg, error_code = "EXTERNAL_API_ERROR", "External API error");
                (StatusCode::BAD_GATEWAY, "EXTERNAL_API_ERROR")
            }
            AppError::Config(msg) => {
                tracing::error!(message = %msg, error_code = "CONFIG_ERROR", "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            AppError::InvalidParam(param) => {
                tracing::warn!(param = %param, error_code = "INVALID_PARAM", "Invalid parameter");
                (StatusCode::BAD_REQUEST, "INVALID_PARAM")
            }
        };

        tracing::debug!(
            status_code = %status.as_u16(),
            error_code = %code,
            error_message = %self.to_string(),
            "Returning error response"
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
