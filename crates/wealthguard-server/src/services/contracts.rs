//! Smart-contract risk classification
//!
//! Verified source is scanned with keyword heuristics. Contracts whose source
//! cannot be obtained (no API key, fetch failure, unverified on Etherscan) are
//! always reported as unverified and risky.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use wealthguard_core::ContractVerdict;

use crate::config::ContractsConfig;
use crate::error::{AppError, AppResult};

pub const RISKY_PATTERN_ISSUE: &str = "Contains functions or patterns often used in risky contracts (owner controls, delegatecall, selfdestruct, transferFrom)";
pub const APPROVE_ISSUE: &str =
    "Has approve function: check for unlimited approvals or unsafe patterns";
pub const LARGE_SOURCE_ISSUE: &str = "Large contract source: manual audit recommended";

/// Sources longer than this get a manual-audit note.
pub const LARGE_SOURCE_CHARS: usize = 20_000;

static RISKY_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)resolve|owner|onlyOwner|transferFrom\(|balanceOf\(|selfdestruct|delegatecall")
        .expect("risky pattern regex is valid")
});

static APPROVE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+approve\s*\(").expect("approve regex is valid")
});

#[async_trait]
pub trait ContractClassifier: Send + Sync {
    /// Never fails: missing keys and fetch errors produce an unverified verdict.
    async fn analyze(&self, address: &str, api_key: Option<&str>) -> ContractVerdict;
    fn name(&self) -> &str;
}

/// Classify a contract from its (possibly missing) source code.
pub fn classify_source(address: &str, source: Option<&str>) -> ContractVerdict {
    let source = match source {
        Some(s) if !s.is_empty() => s,
        _ => return ContractVerdict::unverified(address),
    };

    let mut issues = Vec::new();
    let mut risky = false;

    if RISKY_PATTERNS.is_match(source) {
        issues.push(RISKY_PATTERN_ISSUE.to_string());
        risky = true;
    }
    if APPROVE_FUNCTION.is_match(source) {
        issues.push(APPROVE_ISSUE.to_string());
    }
    if source.chars().count() > LARGE_SOURCE_CHARS {
        issues.push(LARGE_SOURCE_ISSUE.to_string());
    }

    ContractVerdict {
        address: address.to_string(),
        verified: true,
        risky,
        issues: if issues.is_empty() { None } else { Some(issues) },
    }
}

// ============================================================================
// Etherscan - verified source lookup
// ============================================================================

#[derive(Clone)]
pub struct EtherscanClassifier {
    client: Client,
    api_url: String,
}

impl EtherscanClassifier {
    pub fn new(config: &ContractsConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(api_url = %config.etherscan_url, "Creating Etherscan classifier");

        Ok(Self {
            client,
            api_url: config.etherscan_url.clone(),
        })
    }

    /// Verified source (or ABI) for `address`, `None` when Etherscan has none.
    pub async fn fetch_source(&self, address: &str, api_key: &str) -> AppResult<Option<String>> {
        let start = Instant::now();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Etherscan request failed: {}", e)))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse Etherscan response: {}", e)))?;

        tracing::debug!(
            address = %address,
            status = %json["status"],
            duration_ms = %start.elapsed().as_millis(),
            "Etherscan source lookup completed"
        );

        Ok(extract_source(&json))
    }
}

/// `SourceCode`, else `ABI`, of the first result of a successful response.
fn extract_source(json: &Value) -> Option<String> {
    if json["status"].as_str() != Some("1") {
        return None;
    }
    let first = json["result"].as_array()?.first()?;
    ["SourceCode", "ABI"]
        .iter()
        .filter_map(|key| first[*key].as_str())
        .find(|s| !s.is_empty())
        .map(String::from)
}

#[async_trait]
impl ContractClassifier for EtherscanClassifier {
    async fn analyze(&self, address: &str, api_key: Option<&str>) -> ContractVerdict {
        let api_key = match api_key.map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                tracing::debug!(address = %address, "No Etherscan key supplied, contract treated as unverified");
                return ContractVerdict::unverified(address);
            }
        };

        match self.fetch_source(address, api_key).await {
            Ok(source) => classify_source(address, source.as_deref()),
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Contract source fetch failed, treating as unverified");
                ContractVerdict::unverified(address)
            }
        }
    }

    fn name(&self) -> &str {
        "etherscan"
    }
}

// ============================================================================
// Offline - never fetches
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct OfflineClassifier;

#[async_trait]
impl ContractClassifier for OfflineClassifier {
    async fn analyze(&self, address: &str, _api_key: Option<&str>) -> ContractVerdict {
        classify_source(address, None)
    }

    fn name(&self) -> &str {
        "offline"
    }
}
