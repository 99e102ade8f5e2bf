pub mod dto;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Scoring endpoints
        .route("/money_meter", post(handlers::money_meter))
        .route("/scam_check", post(handlers::scam_check))
        .route("/personalized_score", post(handlers::personalized))
        .route("/combined_risk", post(handlers::combined_risk))
        .route("/verify", post(handlers::verify))
        // User portfolio endpoints
        .route("/api/v1/users", post(handlers::create_user))
        .route("/api/v1/users/{username}/tokens", get(handlers::get_tokens))
        .route("/api/v1/users/{username}/assets", post(handlers::add_asset))
        .route("/api/v1/users/{username}/portfolio", get(handlers::get_portfolio))
        .route("/api/v1/users/{username}/chat", post(handlers::chat))
}
