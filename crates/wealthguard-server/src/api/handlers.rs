use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use std::time::Instant;
use wealthguard_core::{
    advisor, build_summary, calculate_combined_risk, compute_volatility_score, personalized_score,
    require_price_history, Asset, CombinedRisk, ContractVerdict, LedgerReceipt, PersonalizedScore,
    PortfolioSummary,
};

use super::dto::*;
use crate::error::{AppError, AppResult};
use crate::services::resolve_price;
use crate::AppState;

const MAX_USERNAME_LEN: usize = 64;

fn validate_username(username: &str) -> AppResult<&str> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidParam("Username cannot be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::InvalidParam("Username too long".to_string()));
    }
    Ok(username)
}

/// Price every holding (with fallback), then score the portfolio.
async fn summarize(state: &AppState, assets: &[Asset]) -> AppResult<PortfolioSummary> {
    let timeout = state.price_timeout();
    let mut quotes = Vec::with_capacity(assets.len());
    for asset in assets {
        quotes.push(resolve_price(state.prices.as_ref(), asset, timeout, &state.rng).await);
    }

    let mut quotes = quotes.into_iter();
    let summary = state.rng.with(|rng| {
        build_summary(assets, |_| quotes.next().unwrap_or_default(), rng)
    })?;
    Ok(summary)
}

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    tracing::debug!("Processing health check request");

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        price_feed: state.prices.name().to_string(),
        contracts: state.contracts.name().to_string(),
        ledger: state.ledger.mode().to_string(),
    }))
}

pub async fn money_meter(Json(request): Json<PricesRequest>) -> AppResult<Json<MoneyMeterResponse>> {
    let start = Instant::now();
    println!("[REQUEST] POST /money_meter n={}", request.prices.len());

    require_price_history(&request.prices)?;
    let reading = compute_volatility_score(&request.prices);

    let duration = start.elapsed().as_millis();
    println!("[RESPONSE] POST /money_meter -> 200 OK ({}ms) score={}", duration, reading.score);
    tracing::info!(
        n = %request.prices.len(),
        score = %reading.score,
        sigma = %reading.sigma,
        duration_ms = %duration,
        "Volatility scored"
    );

    Ok(Json(MoneyMeterResponse {
        score: reading.score,
        volatility: reading.sigma,
        n: request.prices.len(),
    }))
}

pub async fn scam_check(
    State(state): State<AppState>,
    Json(request): Json<ContractRequest>,
) -> AppResult<Json<ContractVerdict>> {
    let start = Instant::now();
    println!("[REQUEST] POST /scam_check address={}", request.address);

    if request.address.trim().is_empty() {
        return Err(AppError::InvalidParam("Contract address cannot be empty".to_string()));
    }

    let verdict = state
        .contracts
        .analyze(&request.address, request.etherscan_api_key.as_deref())
        .await;

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] POST /scam_check -> 200 OK ({}ms) verified={} risky={}",
        duration, verdict.verified, verdict.risky
    );
    tracing::info!(
        address = %verdict.address,
        verified = %verdict.verified,
        risky = %verdict.risky,
        duration_ms = %duration,
        "Contract classified"
    );

    Ok(Json(verdict))
}

pub async fn personalized(
    State(state): State<AppState>,
    Json(request): Json<PersonalizedScoreRequest>,
) -> AppResult<Json<PersonalizedScore>> {
    let start = Instant::now();
    println!(
        "[REQUEST] POST /personalized_score n={} preference={}",
        request.prices.len(),
        request.risk_preference
    );

    // Reject short histories before spending a contract lookup
    require_price_history(&request.prices)?;

    let verdict = match request.contract_address.as_deref() {
        Some(address) if !address.trim().is_empty() => Some(
            state
                .contracts
                .analyze(address, request.etherscan_api_key.as_deref())
                .await,
        ),
        _ => None,
    };

    let result = personalized_score(&request.prices, &request.risk_preference, verdict)?;

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] POST /personalized_score -> 200 OK ({}ms) score={}",
        duration, result.score
    );
    tracing::info!(
        preference = %request.risk_preference,
        volatility = %result.volatility,
        score = %result.score,
        contract_checked = %result.scam.is_some(),
        duration_ms = %duration,
        "Personalized score computed"
    );

    Ok(Json(result))
}

pub async fn combined_risk(Json(request): Json<CombinedRiskRequest>) -> AppResult<Json<CombinedRisk>> {
    let risk = calculate_combined_risk(&request.assets);
    tracing::info!(
        assets = %request.assets.len(),
        combined_score = %risk.combined_score,
        band = ?risk.band,
        "Combined risk computed"
    );
    Ok(Json(risk))
}

pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> AppResult<Json<LedgerReceipt>> {
    let start = Instant::now();
    println!("[REQUEST] POST /verify assets={:?} score={}", request.assets, request.score);

    if !request.score.is_finite() {
        return Err(AppError::InvalidParam(format!("Invalid score: {}", request.score)));
    }

    let receipt = state
        .ledger
        .submit(&request.assets, request.score, &request.recommendation)
        .await;

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] POST /verify -> 200 OK ({}ms) success={}",
        duration, receipt.success
    );
    tracing::info!(
        ledger = %state.ledger.mode(),
        memo = %receipt.memo,
        success = %receipt.success,
        duration_ms = %duration,
        "Verification submitted"
    );

    Ok(Json(receipt))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<Json<CreateUserResponse>> {
    let username = validate_username(&request.username)?;

    let mut registry = state.registry.write().await;
    let created = registry.create_user(username);
    let tokens = registry.tokens(username);
    drop(registry);

    tracing::info!(username = %username, created = %created, tokens = %tokens, "User registration");

    Ok(Json(CreateUserResponse {
        username: username.to_string(),
        created,
        tokens,
    }))
}

pub async fn get_tokens(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<TokensResponse>> {
    let username = validate_username(&username)?.to_string();
    let registry = state.registry.read().await;
    if !registry.contains_user(&username) {
        return Err(AppError::UserNotFound(username));
    }
    let tokens = registry.tokens(&username);

    Ok(Json(TokensResponse { username, tokens }))
}

pub async fn add_asset(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(asset): Json<Asset>,
) -> AppResult<Json<HoldingsResponse>> {
    let username = validate_username(&username)?.to_string();
    if asset.symbol.trim().is_empty() {
        return Err(AppError::InvalidParam("Asset name cannot be empty".to_string()));
    }
    if asset.amount < Decimal::ZERO {
        return Err(AppError::InvalidParam(format!("Negative amount: {}", asset.amount)));
    }

    let mut registry = state.registry.write().await;
    if !registry.contains_user(&username) {
        return Err(AppError::UserNotFound(username));
    }
    tracing::info!(
        username = %username,
        asset = %asset.symbol,
        amount = %asset.amount,
        asset_type = %asset.asset_type,
        "Adding holding"
    );
    registry.add_asset(&username, asset);
    let holdings = registry.portfolio(&username);

    Ok(Json(HoldingsResponse { username, holdings }))
}

pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<PortfolioSummary>> {
    let start = Instant::now();
    let username = validate_username(&username)?.to_string();
    println!("[REQUEST] GET /api/v1/users/{}/portfolio", username);

    let holdings = {
        let registry = state.registry.read().await;
        if !registry.contains_user(&username) {
            return Err(AppError::UserNotFound(username));
        }
        registry.portfolio(&username)
    };

    let summary = summarize(&state, &holdings).await?;

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] GET /api/v1/users/{}/portfolio -> 200 OK ({}ms) assets={} value=${}",
        username,
        duration,
        summary.assets.len(),
        summary.stats.total_value
    );
    tracing::info!(
        username = %username,
        assets = %summary.assets.len(),
        total_value = %summary.stats.total_value,
        average_risk = %summary.stats.average_risk,
        diversification = %summary.diversification_score,
        duration_ms = %duration,
        "Portfolio summary computed"
    );

    Ok(Json(summary))
}

pub async fn chat(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let username = validate_username(&username)?.to_string();

    let holdings = {
        let registry = state.registry.read().await;
        if !registry.contains_user(&username) {
            return Err(AppError::UserNotFound(username));
        }
        if registry.tokens(&username) == 0 {
            return Err(AppError::TokensExhausted(username));
        }
        registry.portfolio(&username)
    };

    // A token is only spent on a question that gets an answer
    let summary = summarize(&state, &holdings).await?;
    let tokens_remaining = state.registry.write().await.spend_token(&username)?;
    let answer = advisor::respond(&request.question, &summary);

    tracing::info!(
        username = %username,
        topic = ?advisor::AdvisorTopic::classify(&request.question),
        tokens_remaining = %tokens_remaining,
        "Advisor question answered"
    );

    Ok(Json(ChatResponse {
        username,
        answer,
        tokens_remaining,
    }))
}
