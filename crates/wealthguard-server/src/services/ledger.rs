//! Portfolio decision verification on a distributed ledger
//!
//! The verifier records a short memo for a scored portfolio. The mock
//! verifier answers with a fixed receipt; the Hedera verifier hands the memo
//! to a submission relay that signs and submits it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use wealthguard_core::{decision_memo, LedgerReceipt};

use crate::config::LedgerConfig;
use crate::error::{AppError, AppResult};

pub const MOCK_TRANSACTION_ID: &str = "0.0.1234567.8901234";
pub const MISSING_CREDENTIALS: &str =
    "Hedera credentials not set up. Configure ledger.account_id and ledger.operator_key";

#[async_trait]
pub trait LedgerVerifier: Send + Sync {
    /// Never fails: problems are reported in the receipt's `error` field.
    async fn submit(&self, assets: &[String], score: f64, recommendation: &str) -> LedgerReceipt;
    fn mode(&self) -> &str;
}

// ============================================================================
// Mock
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MockLedgerVerifier;

#[async_trait]
impl LedgerVerifier for MockLedgerVerifier {
    async fn submit(&self, assets: &[String], score: f64, _recommendation: &str) -> LedgerReceipt {
        LedgerReceipt {
            success: true,
            transaction_id: Some(MOCK_TRANSACTION_ID.to_string()),
            status: Some("SUCCESS".to_string()),
            memo: decision_memo(score, assets),
            explorer_url: Some("https://hashscan.io/testnet".to_string()),
            error: None,
            note: Some("MOCK TRANSACTION".to_string()),
        }
    }

    fn mode(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Hedera - relay submission
// ============================================================================

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    network: &'a str,
    account_id: &'a str,
    memo: &'a str,
    recommendation: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    transaction_id: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone)]
pub struct HederaLedgerVerifier {
    client: Client,
    network: String,
    account_id: String,
    operator_key: String,
    submit_url: String,
}

impl HederaLedgerVerifier {
    pub fn new(config: &LedgerConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        if config.account_id.is_empty() || config.operator_key.is_empty() {
            tracing::warn!("Hedera verifier configured without credentials, submissions will fail");
        }

        Ok(Self {
            client,
            network: config.network.clone(),
            account_id: config.account_id.clone(),
            operator_key: config.operator_key.clone(),
            submit_url: config.submit_url.clone(),
        })
    }

    pub fn explorer_url(&self, transaction_id: &str) -> String {
        format!(
            "https://hashscan.io/{}/transaction/{}",
            self.network, transaction_id
        )
    }

    async fn send(&self, memo: &str, recommendation: &str) -> AppResult<SubmitResponse> {
        let response = self
            .client
            .post(&self.submit_url)
            .bearer_auth(&self.operator_key)
            .json(&SubmitRequest {
                network: &self.network,
                account_id: &self.account_id,
                memo,
                recommendation,
            })
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Ledger relay request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Ledger relay error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse ledger relay response: {}", e)))
    }
}

#[async_trait]
impl LedgerVerifier for HederaLedgerVerifier {
    async fn submit(&self, assets: &[String], score: f64, recommendation: &str) -> LedgerReceipt {
        let memo = decision_memo(score, assets);

        if self.account_id.is_empty() || self.operator_key.is_empty() {
            tracing::warn!(memo = %memo, "Ledger submission skipped, credentials missing");
            return LedgerReceipt::failed(memo, MISSING_CREDENTIALS);
        }
        if self.submit_url.is_empty() {
            tracing::warn!(memo = %memo, "Ledger submission skipped, no relay configured");
            return LedgerReceipt::failed(memo, "No ledger relay configured (ledger.submit_url)");
        }

        let start = Instant::now();
        match self.send(&memo, recommendation).await {
            Ok(submitted) => {
                tracing::info!(
                    memo = %memo,
                    transaction_id = %submitted.transaction_id,
                    duration_ms = %start.elapsed().as_millis(),
                    "Portfolio decision recorded on ledger"
                );
                LedgerReceipt {
                    success: true,
                    explorer_url: Some(self.explorer_url(&submitted.transaction_id)),
                    status: Some(submitted.status.unwrap_or_else(|| "SUCCESS".to_string())),
                    transaction_id: Some(submitted.transaction_id),
                    memo,
                    error: None,
                    note: None,
                }
            }
            Err(e) => {
                tracing::error!(memo = %memo, error = %e, "Ledger submission failed");
                LedgerReceipt::failed(memo, e.to_string())
            }
        }
    }

    fn mode(&self) -> &str {
        "hedera"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_mock_receipt_is_fixed() {
        let receipt = MockLedgerVerifier
            .submit(&symbols(&["BTC", "AAPL", "BOND"]), 4.0, "Medium Risk")
            .await;
        assert!(receipt.success);
        assert_eq!(receipt.transaction_id.as_deref(), Some(MOCK_TRANSACTION_ID));
        assert_eq!(receipt.status.as_deref(), Some("SUCCESS"));
        assert_eq!(receipt.memo, "WG:4.0:BTC,AAPL");
        assert!(receipt.error.is_none());

        let again = MockLedgerVerifier
            .submit(&symbols(&["BTC", "AAPL", "BOND"]), 4.0, "Medium Risk")
            .await;
        assert_eq!(receipt, again);
    }

    #[tokio::test]
    async fn test_hedera_without_credentials() {
        let verifier = HederaLedgerVerifier::new(&LedgerConfig::default()).unwrap();
        let receipt = verifier.submit(&symbols(&["ETH"]), 7.4, "High Risk").await;
        assert!(!receipt.success);
        assert_eq!(receipt.error.as_deref(), Some(MISSING_CREDENTIALS));
        assert_eq!(receipt.memo, "WG:7.4:ETH");
        assert!(receipt.transaction_id.is_none());
    }

    #[tokio::test]
    async fn test_hedera_without_relay() {
        let verifier = HederaLedgerVerifier::new(&LedgerConfig {
            account_id: "0.0.4242".to_string(),
            operator_key: "secret".to_string(),
            ..LedgerConfig::default()
        })
        .unwrap();
        let receipt = verifier.submit(&symbols(&["ETH"]), 7.4, "High Risk").await;
        assert!(!receipt.success);
        assert!(receipt.error.unwrap().contains("relay"));
    }

    #[tokio::test]
    async fn test_hedera_relay_unreachable() {
        let verifier = HederaLedgerVerifier::new(&LedgerConfig {
            account_id: "0.0.4242".to_string(),
            operator_key: "secret".to_string(),
            submit_url: "http://127.0.0.1:9/submit".to_string(),
            timeout_seconds: 2,
            ..LedgerConfig::default()
        })
        .unwrap();
        let receipt = verifier.submit(&symbols(&["BTC", "ETH"]), 5.0, "Hold").await;
        assert!(!receipt.success);
        assert_eq!(receipt.memo, "WG:5.0:BTC,ETH");
        assert!(receipt.error.is_some());
    }

    #[test]
    fn test_explorer_url() {
        let verifier = HederaLedgerVerifier::new(&LedgerConfig::default()).unwrap();
        assert_eq!(
            verifier.explorer_url("0.0.1@1700000000.1"),
            "https://hashscan.io/testnet/transaction/0.0.1@1700000000.1"
        );
    }
}
