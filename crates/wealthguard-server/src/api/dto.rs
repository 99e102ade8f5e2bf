use serde::{Deserialize, Serialize};
use wealthguard_core::Asset;

// ============================================================================
// POST /money_meter
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PricesRequest {
    pub prices: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct MoneyMeterResponse {
    pub score: u8,
    /// Sigma of the log returns
    pub volatility: f64,
    pub n: usize,
}

// ============================================================================
// POST /scam_check
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ContractRequest {
    pub address: String,
    #[serde(default)]
    pub etherscan_api_key: Option<String>,
}

// ============================================================================
// POST /personalized_score
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PersonalizedScoreRequest {
    pub prices: Vec<f64>,
    #[serde(default = "default_risk_preference")]
    pub risk_preference: String,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub etherscan_api_key: Option<String>,
}

fn default_risk_preference() -> String {
    "neutral".to_string()
}

// ============================================================================
// POST /combined_risk
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CombinedRiskRequest {
    pub assets: Vec<String>,
}

// ============================================================================
// POST /verify
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub assets: Vec<String>,
    pub score: f64,
    #[serde(default)]
    pub recommendation: String,
}

// ============================================================================
// /api/v1/users
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub username: String,
    pub created: bool,
    pub tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub username: String,
    pub tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct HoldingsResponse {
    pub username: String,
    pub holdings: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub username: String,
    pub answer: String,
    pub tokens_remaining: u32,
}

// ============================================================================
// Health check
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub price_feed: String,
    pub contracts: String,
    pub ledger: String,
}
