//! Error types for WealthGuard Core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WealthGuardError {
    #[error("Need at least two price points, got {got}")]
    InsufficientPrices { got: usize },

    #[error("User not found: {0}")]
    UnknownUser(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("No advisor tokens left for {0}")]
    TokensExhausted(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),
}

pub type WealthGuardResult<T> = Result<T, WealthGuardError>;
